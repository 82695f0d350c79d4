mod config;
mod error;
mod record;
mod paths;
mod loader;

mod progress;
mod util;
mod pipeline;

mod dedupe;
mod partition;
mod writer;

pub use crate::config::{DedupOptions, ABSTRACT_COLUMN, DEFAULT_BASE_NAME, DEFAULT_CHUNK_ROWS, DEFAULT_MAX_PART_MB, TITLE_COLUMN};
pub use crate::error::{DedupError, DedupResult};
pub use crate::record::{Record, RecordSet, Schema};
pub use crate::pipeline::{Deduplicator, RunReport, StageReport, WrittenPart};

// Input selection.
pub use crate::paths::{select_inputs, DirScanSource, PathListSource, SourceProvider};
pub use crate::loader::load_sources;

// Expose progress sinks so callers can run headless or drive their own UI.
pub use crate::progress::{make_count_progress, ProgressScope, ProgressSink, SilentProgress, TerminalProgress};

pub use crate::util::init_tracing_once;

// export the individual stages for callers composing their own pipeline
pub use crate::dedupe::{remove_abstract_duplicates, remove_exact_duplicates, remove_word_and_compare, remove_word_variants, title_key, WordPosition};

// export partitioning and the part writer
pub use crate::partition::{estimate_record_size, part_file_name, plan_partitions, Partition};
pub use crate::writer::{write_partitions, CsvPartWriter};
