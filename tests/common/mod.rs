#![allow(dead_code)]

use refdedup::{ProgressSink, RecordSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Write a CSV file from a header and rows (each field quoted by the csv writer as needed).
pub fn write_csv(path: &Path, header: &[&str], rows: &[Vec<&str>]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut w = csv::Writer::from_path(path).unwrap();
    w.write_record(header).unwrap();
    for r in rows {
        w.write_record(r).unwrap();
    }
    w.flush().unwrap();
}

/// Read a CSV back as (header, rows).
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut r = csv::Reader::from_path(path).unwrap();
    let header = r.headers().unwrap().iter().map(|s| s.to_string()).collect();
    let rows = r
        .records()
        .map(|rec| rec.unwrap().iter().map(|s| s.to_string()).collect())
        .collect();
    (header, rows)
}

/// Titles-only record set, one record per entry.
pub fn titles(items: &[&str]) -> RecordSet {
    RecordSet::from_rows(&["title"], items.iter().map(|t| vec![*t]))
}

/// Title values of a set, missing titles as "".
pub fn title_values(set: &RecordSet) -> Vec<String> {
    set.column_values("title")
        .into_iter()
        .map(|v| v.unwrap_or("").to_string())
        .collect()
}

/// Original load positions of the records in a set.
pub fn rows_of(set: &RecordSet) -> Vec<usize> {
    set.iter().map(|r| r.row).collect()
}

/// A small export shaped like a screening-tool download:
/// - rows 0/1 are exact title duplicates
/// - row 2 differs from row 0 by a stray "." on its last word
/// - row 3 shares row 4's abstract but has an unrelated title
/// - row 5 is a one-word title
pub fn make_export(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    write_csv(
        &path,
        &["key", "title", "abstract", "year"],
        &[
            vec!["r1", "Effects of exercise on sleep", "Sleep improved.", "2020"],
            vec!["r2", "Effects of exercise on sleep", "Sleep improved.", "2020"],
            vec!["r3", "Effects of exercise on sleep.", "Another abstract.", "2021"],
            vec!["r4", "Diet and mood in adolescents", "Shared abstract text.", "2019"],
            vec!["r5", "Screen time and cognition", "Shared abstract text.", "2018"],
            vec!["r6", "Editorial", "", "2022"],
        ],
    );
    path
}

/// Progress sink that records every event, for asserting what the pipeline reports.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl ProgressSink for RecordingProgress {
    fn begin(&self, label: &str, total: u64) {
        self.events.lock().unwrap().push(format!("begin {} {}", label, total));
    }
    fn inc(&self, delta: u64) {
        self.events.lock().unwrap().push(format!("inc {}", delta));
    }
    fn finish(&self, msg: &str) {
        self.events.lock().unwrap().push(format!("finish {}", msg));
    }
}
