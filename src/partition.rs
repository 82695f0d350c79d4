use crate::error::{DedupError, DedupResult};
use crate::progress::{ProgressScope, ProgressSink};
use crate::record::{Record, RecordSet};
use csv::WriterBuilder;
use std::sync::Arc;

/// One output file worth of records.
///
/// File layout:
///   <out_dir>/<base>_parte_<N>.csv   (N = 1, 2, 3, ... without gaps)
#[derive(Clone, Debug)]
pub struct Partition {
    pub number: usize,
    pub file_name: String,
    pub records: Vec<Arc<Record>>,
    pub estimated_bytes: u64,
}

pub fn part_file_name(base: &str, number: usize) -> String {
    format!("{}_parte_{}.csv", base, number)
}

/// Estimated size of `rec` as a lone CSV row (header excluded, terminator included).
/// Missing values serialize as empty fields.
pub fn estimate_record_size(rec: &Record) -> DedupResult<u64> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(Vec::with_capacity(256));
    w.write_record(rec.values.iter().map(|v| v.as_deref().unwrap_or("")))
        .map_err(DedupError::Encode)?;
    let buf = w
        .into_inner()
        .map_err(|e| DedupError::Encode(e.into_error().into()))?;
    Ok(buf.len() as u64)
}

/// Fold state: the open partition, its running size, and everything sealed so far.
struct Acc {
    current: Vec<Arc<Record>>,
    bytes: u64,
    sealed: Vec<Partition>,
}

impl Acc {
    fn seal(mut self, base: &str) -> Self {
        if !self.current.is_empty() {
            let number = self.sealed.len() + 1;
            self.sealed.push(Partition {
                number,
                file_name: part_file_name(base, number),
                records: std::mem::take(&mut self.current),
                estimated_bytes: self.bytes,
            });
        }
        self.bytes = 0;
        self
    }
}

/// Greedy split of `set` into parts of roughly `max_bytes` each.
///
/// Records keep their order. After a record is appended, the part is sealed if its
/// running size exceeds `max_bytes`, so a part may overshoot by at most that last
/// record. A non-empty trailing part is always emitted.
pub fn plan_partitions(
    set: &RecordSet,
    base: &str,
    max_bytes: u64,
    sink: &dyn ProgressSink,
) -> DedupResult<Vec<Partition>> {
    let sizes = set
        .iter()
        .map(|r| estimate_record_size(r))
        .collect::<DedupResult<Vec<u64>>>()?;

    let pb = ProgressScope::count(sink, "Splitting files", set.len() as u64);
    let start = Acc { current: Vec::new(), bytes: 0, sealed: Vec::new() };
    let acc = set.iter().zip(sizes).fold(start, |mut acc, (rec, size)| {
        pb.inc_items(1);
        acc.current.push(Arc::clone(rec));
        acc.bytes += size;
        if acc.bytes > max_bytes {
            acc.seal(base)
        } else {
            acc
        }
    });
    let parts = acc.seal(base).sealed;

    pb.finish(format!("{} part(s) planned", parts.len()));
    Ok(parts)
}
