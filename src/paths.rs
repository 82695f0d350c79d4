//! Input selection: where the CSV exports to process come from.

use crate::error::{DedupError, DedupResult};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supplies the list of input files for a run. An empty list means "nothing selected".
pub trait SourceProvider {
    fn sources(&self) -> DedupResult<Vec<PathBuf>>;
}

/// Fixed list of paths, e.g. taken from the command line. Order is kept as given.
#[derive(Clone, Debug, Default)]
pub struct PathListSource {
    paths: Vec<PathBuf>,
}

impl PathListSource {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { paths: paths.into_iter().map(Into::into).collect() }
    }
}

impl SourceProvider for PathListSource {
    fn sources(&self) -> DedupResult<Vec<PathBuf>> {
        Ok(self.paths.clone())
    }
}

/// Scan a directory for export files whose name matches `pattern`.
/// Results are sorted by path so repeated runs see the same order.
#[derive(Clone, Debug)]
pub struct DirScanSource {
    dir: PathBuf,
    pattern: Regex,
    max_depth: usize,
}

impl DirScanSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            pattern: default_csv_pattern(),
            max_depth: 1,
        }
    }

    pub fn pattern(mut self, re: Regex) -> Self {
        self.pattern = re;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }
}

fn default_csv_pattern() -> Regex {
    Regex::new(r"(?i)\.csv$").expect("static regex")
}

impl SourceProvider for DirScanSource {
    fn sources(&self) -> DedupResult<Vec<PathBuf>> {
        let mut found = Vec::new();
        if !self.dir.exists() {
            tracing::warn!("input directory {} does not exist", self.dir.display());
            return Ok(found);
        }
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(self.max_depth) {
            let ent = match entry {
                Ok(ent) => ent,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry under {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            if !ent.file_type().is_file() {
                continue;
            }
            if let Some(name) = ent.file_name().to_str() {
                if self.pattern.is_match(name) {
                    found.push(ent.path().to_path_buf());
                }
            }
        }
        found.sort();
        Ok(found)
    }
}

/// Resolve the provider's selection, turning an empty selection into `NoInput`.
pub fn select_inputs(provider: &dyn SourceProvider) -> DedupResult<Vec<PathBuf>> {
    let paths = provider.sources()?;
    if paths.is_empty() {
        return Err(DedupError::NoInput);
    }
    tracing::info!("Selected {} input file(s).", paths.len());
    Ok(paths)
}
