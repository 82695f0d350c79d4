use crate::config::{DedupOptions, ABSTRACT_COLUMN, TITLE_COLUMN};
use crate::dedupe::{remove_abstract_duplicates, remove_exact_duplicates, remove_word_variants};
use crate::error::{DedupError, DedupResult};
use crate::loader::load_sources;
use crate::partition::{plan_partitions, Partition};
use crate::paths::{select_inputs, SourceProvider};
use crate::progress::{ProgressSink, SilentProgress, TerminalProgress};
use crate::record::RecordSet;
use crate::writer::write_partitions;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Record counts around one pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub before: usize,
    pub after: usize,
}

impl StageReport {
    fn new(stage: impl Into<String>, before: usize, after: usize) -> Self {
        Self { stage: stage.into(), before, after }
    }

    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct WrittenPart {
    pub path: PathBuf,
    pub records: usize,
    pub estimated_bytes: u64,
}

/// Summary of a full run, printable as JSON.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub inputs: Vec<PathBuf>,
    pub loaded: usize,
    pub stages: Vec<StageReport>,
    pub kept: usize,
    pub parts: Vec<WrittenPart>,
}

#[derive(Clone, Default)]
pub struct Deduplicator {
    pub(crate) opts: DedupOptions,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self { opts: DedupOptions::default() }
    }

    pub fn with_options(opts: DedupOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn out_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_out_dir(dir); self }
    pub fn base_name(mut self, base: impl Into<String>) -> Self { self.opts = self.opts.with_base_name(base); self }
    pub fn max_part_bytes(mut self, bytes: u64) -> Self { self.opts = self.opts.with_max_part_bytes(bytes); self }
    pub fn max_part_mb(mut self, mb: u64) -> Self { self.opts = self.opts.with_max_part_mb(mb); self }
    pub fn chunk_rows(mut self, rows: usize) -> Self { self.opts = self.opts.with_chunk_rows(rows); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    pub fn options(&self) -> &DedupOptions {
        &self.opts
    }

    /// Load everything `provider` selects into one record set.
    pub fn load(&self, provider: &dyn SourceProvider) -> DedupResult<(Vec<PathBuf>, RecordSet)> {
        let inputs = select_inputs(provider)?;
        let set = load_sources(&inputs, self.opts.chunk_rows, self.opts.read_buffer_bytes)?;
        Ok((inputs, set))
    }

    /// Run the dedupe stages on an already loaded set. Fails only if the
    /// `title` column is missing, which is checked before any stage runs.
    pub fn process(&self, set: &RecordSet, sink: &dyn ProgressSink) -> DedupResult<(RecordSet, Vec<StageReport>)> {
        let schema = set.schema();
        if !schema.contains(TITLE_COLUMN) {
            return Err(DedupError::Schema { column: TITLE_COLUMN.to_string() });
        }
        let has_abstract = schema.contains(ABSTRACT_COLUMN);
        let mut stages = Vec::with_capacity(6);

        let exact = remove_exact_duplicates(set, TITLE_COLUMN);
        stages.push(StageReport::new("exact title", set.len(), exact.len()));
        tracing::info!("Exact title match: {} -> {}", set.len(), exact.len());

        let mut current = exact;
        for (position, out) in remove_word_variants(&current, TITLE_COLUMN, sink) {
            stages.push(StageReport::new(position.label(), current.len(), out.len()));
            tracing::info!("Word removal ({}): {} -> {}", position.label(), current.len(), out.len());
            current = out;
        }

        if !has_abstract {
            tracing::info!("No `{}` column; skipping abstract match", ABSTRACT_COLUMN);
        }
        let deduped = remove_abstract_duplicates(&current, ABSTRACT_COLUMN, has_abstract);
        stages.push(StageReport::new("exact abstract", current.len(), deduped.len()));
        tracing::info!("Exact abstract match: {} -> {}", current.len(), deduped.len());

        Ok((deduped, stages))
    }

    /// Split a final set into parts under the configured size budget.
    pub fn plan(&self, set: &RecordSet, sink: &dyn ProgressSink) -> DedupResult<Vec<Partition>> {
        let parts = plan_partitions(set, &self.opts.base_name, self.opts.max_part_bytes, sink)?;
        if parts.is_empty() {
            tracing::warn!("No records left after dedupe; nothing to write.");
        }
        Ok(parts)
    }

    /// Full job: select, load, dedupe, split and write.
    /// Progress goes to the terminal when enabled, otherwise nowhere.
    pub fn run(&self, provider: &dyn SourceProvider) -> DedupResult<RunReport> {
        if self.opts.progress {
            self.run_with(provider, &TerminalProgress::new())
        } else {
            self.run_with(provider, &SilentProgress)
        }
    }

    pub fn run_with(&self, provider: &dyn SourceProvider, sink: &dyn ProgressSink) -> DedupResult<RunReport> {
        let (inputs, loaded) = self.load(provider)?;
        let (deduped, stages) = self.process(&loaded, sink)?;
        let parts = self.plan(&deduped, sink)?;
        let paths = write_partitions(&parts, loaded.schema(), &self.opts.out_dir, self.opts.write_buffer_bytes)?;

        let parts = parts
            .iter()
            .zip(paths)
            .map(|(p, path)| WrittenPart { path, records: p.records.len(), estimated_bytes: p.estimated_bytes })
            .collect();

        Ok(RunReport {
            inputs,
            loaded: loaded.len(),
            stages,
            kept: deduped.len(),
            parts,
        })
    }
}
