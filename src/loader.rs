//! CSV loading: read every selected export in fixed-size row blocks and
//! concatenate them into one record set over the union of their headers.

use crate::error::{DedupError, DedupResult};
use crate::record::{Record, RecordSet, Schema};
use crate::util::open_with_backoff;
use csv::{ReaderBuilder, StringRecord};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load `paths` in order. Rows keep source order, then within-source order.
/// Columns missing from a file load as `None` for that file's rows.
pub fn load_sources(paths: &[PathBuf], chunk_rows: usize, read_buf: usize) -> DedupResult<RecordSet> {
    let mut schema = Schema::default();
    let mut rows: Vec<Record> = Vec::new();

    for path in paths {
        let before = rows.len();
        load_one(path, chunk_rows.max(1), read_buf, &mut schema, &mut rows)?;
        tracing::info!("Loaded {} row(s) from {}", rows.len() - before, path.display());
    }

    let width = schema.len();
    let records = rows
        .into_iter()
        .map(|mut r| {
            r.values.resize(width, None);
            Arc::new(r)
        })
        .collect();

    tracing::info!("Available columns: {:?}", schema.columns());
    Ok(RecordSet::new(Arc::new(schema), records))
}

/// Rows are converted as they are read; `chunk_rows` only sets the block size
/// reported in the debug log.
fn load_one(
    path: &Path,
    chunk_rows: usize,
    read_buf: usize,
    schema: &mut Schema,
    rows: &mut Vec<Record>,
) -> DedupResult<()> {
    let load_err = |source: csv::Error| DedupError::Load { path: path.to_path_buf(), source };

    let f = open_with_backoff(path, 16, 50).map_err(|e| load_err(e.into()))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::with_capacity(read_buf.max(8 * 1024), f));

    let headers = rdr.headers().map_err(load_err)?.clone();
    let mapping = map_headers(&headers, schema);

    let first = rows.len();
    let mut blocks = 0usize;
    let mut rec = StringRecord::new();
    while rdr.read_record(&mut rec).map_err(load_err)? {
        if rec.len() > mapping.len() {
            return Err(DedupError::MalformedRow {
                path: path.to_path_buf(),
                line: rec.position().map(|p| p.line()).unwrap_or(0),
                expected: mapping.len(),
                found: rec.len(),
            });
        }
        rows.push(to_record(rows.len(), &rec, &mapping, schema.len()));
        if (rows.len() - first) % chunk_rows == 0 {
            blocks += 1;
            tracing::debug!("{}: block {} ({} rows)", path.display(), blocks, chunk_rows);
        }
    }
    let tail = (rows.len() - first) % chunk_rows;
    if tail > 0 {
        tracing::debug!("{}: block {} ({} rows)", path.display(), blocks + 1, tail);
    }
    Ok(())
}

/// Map each header of this file onto its position in the union schema.
/// A name repeated within one file gets a `.N` suffix so no column is lost.
fn map_headers(headers: &StringRecord, schema: &mut Schema) -> Vec<usize> {
    let mut local: Vec<String> = Vec::with_capacity(headers.len());
    for h in headers.iter() {
        let mut name = h.to_string();
        let mut n = 1;
        while local.contains(&name) {
            name = format!("{}.{}", h, n);
            n += 1;
        }
        local.push(name);
    }
    local.into_iter().map(|name| schema.push_if_absent(name)).collect()
}

fn to_record(row: usize, rec: &StringRecord, mapping: &[usize], width: usize) -> Record {
    let mut values: Vec<Option<String>> = vec![None; width];
    for (field, &pos) in rec.iter().zip(mapping) {
        if !field.is_empty() {
            values[pos] = Some(field.to_string());
        }
    }
    Record::new(row, values)
}
