//! Error taxonomy for a dedupe run: input selection, loading, schema, encoding and writing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DedupError {
    #[error("no input files were selected")]
    NoInput,

    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to load {}: line {line} has {found} fields, header has {expected}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("required column `{column}` is missing from the loaded data")]
    Schema { column: String },

    #[error("failed to encode record for size estimation: {0}")]
    Encode(#[source] csv::Error),

    #[error("failed to write {} ({} part(s) already written: {}): {source}", path.display(), written.len(), list_paths(written))]
    Write {
        path: PathBuf,
        written: Vec<PathBuf>,
        #[source]
        source: csv::Error,
    },
}

impl DedupError {
    /// True for the load-time failures (unreadable file or malformed CSV).
    pub fn is_load_error(&self) -> bool {
        matches!(self, DedupError::Load { .. } | DedupError::MalformedRow { .. })
    }
}

fn list_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "none".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type DedupResult<T> = std::result::Result<T, DedupError>;
