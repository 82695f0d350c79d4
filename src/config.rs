use std::path::{Path, PathBuf};

/// Base name of the emitted parts: `{base}_parte_{N}.csv`.
pub const DEFAULT_BASE_NAME: &str = "artigos_sem_duplicados_processados";
/// Upload limit of the screening tool is 100 MB; stay under it with headroom.
pub const DEFAULT_MAX_PART_MB: u64 = 90;
/// Rows per block when reading input files.
pub const DEFAULT_CHUNK_ROWS: usize = 5000;

pub const TITLE_COLUMN: &str = "title";
pub const ABSTRACT_COLUMN: &str = "abstract";

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct DedupOptions {
    pub out_dir: PathBuf,           // where parts are written
    pub base_name: String,          // file stem shared by all parts
    pub max_part_bytes: u64,        // approximate size budget per part
    pub chunk_rows: usize,          // rows per block on load
    pub progress: bool,             // show progress bars
    pub read_buffer_bytes: usize,   // BufReader capacity
    pub write_buffer_bytes: usize,  // BufWriter capacity
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            base_name: DEFAULT_BASE_NAME.to_string(),
            max_part_bytes: DEFAULT_MAX_PART_MB * 1024 * 1024,
            chunk_rows: DEFAULT_CHUNK_ROWS,
            progress: true,
            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl DedupOptions {
    pub fn with_out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_base_name(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        let trimmed = base.trim();
        if !trimmed.is_empty() {
            self.base_name = trimmed.to_string();
        }
        self
    }
    pub fn with_max_part_bytes(mut self, bytes: u64) -> Self {
        self.max_part_bytes = bytes.max(1);
        self
    }
    pub fn with_max_part_mb(self, mb: u64) -> Self {
        self.with_max_part_bytes(mb.saturating_mul(1024 * 1024))
    }
    pub fn with_chunk_rows(mut self, rows: usize) -> Self {
        self.chunk_rows = rows.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    // IO buffers tuning
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}
