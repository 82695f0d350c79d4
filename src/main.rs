use anyhow::Result;
use clap::Parser;
use refdedup::{
    init_tracing_once, DedupError, Deduplicator, DirScanSource, PathListSource, SourceProvider,
    DEFAULT_BASE_NAME, DEFAULT_CHUNK_ROWS, DEFAULT_MAX_PART_MB,
};
use regex::Regex;
use std::path::PathBuf;

/// Remove duplicate records from screening-tool CSV exports and split the result
/// into parts small enough to upload again.
#[derive(Parser, Debug)]
#[command(name = "refdedup", version, about)]
struct Cli {
    /// CSV exports to process, in order.
    #[arg(value_name = "INPUTS", conflicts_with = "dir")]
    inputs: Vec<PathBuf>,

    /// Process every matching file in this directory instead.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// File-name regex used with --dir.
    #[arg(long, default_value = r"(?i)\.csv$", requires = "dir")]
    pattern: String,

    /// Directory depth used with --dir (1 = only the directory itself).
    #[arg(long, default_value_t = 1, requires = "dir")]
    max_depth: usize,

    /// Where the parts are written.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Stem of the output files: <base>_parte_<N>.csv
    #[arg(long, default_value = DEFAULT_BASE_NAME)]
    base_name: String,

    /// Approximate size budget per part, in MiB.
    #[arg(long, default_value_t = DEFAULT_MAX_PART_MB)]
    max_mb: u64,

    /// Rows per block while reading inputs.
    #[arg(long, default_value_t = DEFAULT_CHUNK_ROWS)]
    chunk_rows: usize,

    /// Disable progress bars.
    #[arg(long)]
    no_progress: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing_once();
    let cli = Cli::parse();

    let provider: Box<dyn SourceProvider> = match &cli.dir {
        Some(dir) => Box::new(
            DirScanSource::new(dir)
                .pattern(Regex::new(&cli.pattern)?)
                .max_depth(cli.max_depth),
        ),
        None => Box::new(PathListSource::new(cli.inputs.clone())),
    };

    let dedup = Deduplicator::new()
        .out_dir(&cli.out_dir)
        .base_name(&cli.base_name)
        .max_part_mb(cli.max_mb)
        .chunk_rows(cli.chunk_rows)
        .progress(!cli.no_progress);

    let report = match dedup.run(provider.as_ref()) {
        Ok(r) => r,
        Err(DedupError::NoInput) => {
            println!("No files selected.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Loaded {} records from {} file(s).", report.loaded, report.inputs.len());
        for s in &report.stages {
            println!("  {:<20} {:>8} -> {:>8}  (-{})", s.stage, s.before, s.after, s.removed());
        }
        println!("Kept {} records.", report.kept);
        for p in &report.parts {
            println!("Saved {} ({} records)", p.path.display(), p.records);
        }
    }
    Ok(())
}
