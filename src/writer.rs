use crate::error::{DedupError, DedupResult};
use crate::partition::Partition;
use crate::record::Schema;
use crate::util::{create_with_backoff, remove_with_backoff, replace_file_atomic_backoff};
use csv::{Writer, WriterBuilder};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Buffered CSV part writer. Rows go to `<final>.inprogress` and are promoted
/// over the final path (replacing any existing file) on `finish()`.
pub struct CsvPartWriter {
    tmp_path: PathBuf,
    final_path: PathBuf,
    w: Writer<BufWriter<File>>,
}

impl CsvPartWriter {
    pub fn create(final_path: &Path, schema: &Schema, buf_bytes: usize) -> csv::Result<Self> {
        let tmp_path = final_path.with_extension("csv.inprogress");
        let f = create_with_backoff(&tmp_path, 16, 50)?;
        let mut w = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::with_capacity(buf_bytes.max(8 * 1024), f));
        w.write_record(schema.columns())?;
        Ok(Self { tmp_path, final_path: final_path.to_path_buf(), w })
    }

    #[inline]
    pub fn write_values(&mut self, values: &[Option<String>]) -> csv::Result<()> {
        self.w.write_record(values.iter().map(|v| v.as_deref().unwrap_or("")))
    }

    pub fn finish(mut self) -> csv::Result<PathBuf> {
        self.w.flush()?;
        // Close the handle before the rename.
        let CsvPartWriter { tmp_path, final_path, w } = self;
        drop(w);
        replace_file_atomic_backoff(&tmp_path, &final_path)?;
        Ok(final_path)
    }
}

/// Write every partition under `out_dir`, in order. Stops at the first failure:
/// parts already written stay on disk and are listed in the returned error.
pub fn write_partitions(
    parts: &[Partition],
    schema: &Schema,
    out_dir: &Path,
    write_buf: usize,
) -> DedupResult<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(parts.len());
    if let Err(e) = fs::create_dir_all(out_dir) {
        return Err(DedupError::Write { path: out_dir.to_path_buf(), written, source: e.into() });
    }

    for part in parts {
        let path = out_dir.join(&part.file_name);
        match write_one(part, schema, &path, write_buf) {
            Ok(p) => {
                tracing::info!("Saved {} ({} records, ~{} bytes)", p.display(), part.records.len(), part.estimated_bytes);
                written.push(p);
            }
            Err(source) => {
                let _ = remove_with_backoff(&path.with_extension("csv.inprogress"), 4, 25);
                tracing::error!("Writing {} failed after {} part(s): {}", path.display(), written.len(), source);
                return Err(DedupError::Write { path, written, source });
            }
        }
    }
    Ok(written)
}

fn write_one(part: &Partition, schema: &Schema, path: &Path, write_buf: usize) -> csv::Result<PathBuf> {
    let mut w = CsvPartWriter::create(path, schema, write_buf)?;
    for rec in &part.records {
        w.write_values(&rec.values)?;
    }
    w.finish()
}
