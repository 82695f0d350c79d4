#[path = "common/mod.rs"]
mod common;

use common::*;
use refdedup::{estimate_record_size, part_file_name, plan_partitions, Record, RecordSet, SilentProgress};
use std::sync::Arc;

/// Records whose lone-row serialization is exactly 10 bytes ("titleNNNN\n").
fn ten_byte_rows(n: usize) -> RecordSet {
    let rows: Vec<Vec<String>> = (0..n).map(|i| vec![format!("title{:04}", i)]).collect();
    RecordSet::from_rows(&["title"], rows)
}

/// The size estimate is the record written alone as one CSV row, without a header.
/// Missing values are empty fields; quoting counts.
#[test]
fn size_estimate_is_single_row_bytes() {
    let rec = Record::new(0, vec![Some("a".into()), Some("b,c".into()), None]);
    // a,"b,c",\n
    assert_eq!(estimate_record_size(&rec).unwrap(), 9);

    let rec = Record::new(0, vec![Some("title0000".into())]);
    assert_eq!(estimate_record_size(&rec).unwrap(), 10);
}

/// Budget 25 with 10-byte records: a part seals once it passes 25 bytes, i.e. after
/// its third record (30 bytes). Ten records give parts of 3, 3, 3 and a trailing 1.
#[test]
fn parts_seal_after_exceeding_budget() {
    let set = ten_byte_rows(10);
    let parts = plan_partitions(&set, "out", 25, &SilentProgress).unwrap();

    let sizes: Vec<usize> = parts.iter().map(|p| p.records.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 1]);
    let bytes: Vec<u64> = parts.iter().map(|p| p.estimated_bytes).collect();
    assert_eq!(bytes, vec![30, 30, 30, 10]);

    // overshoot is bounded by the one record that triggered the seal
    for p in &parts {
        assert!(p.estimated_bytes <= 25 + 10);
    }
}

/// Reaching the budget exactly does not seal; only exceeding it does.
#[test]
fn budget_reached_exactly_does_not_seal() {
    let set = ten_byte_rows(10);
    let parts = plan_partitions(&set, "out", 30, &SilentProgress).unwrap();
    let sizes: Vec<usize> = parts.iter().map(|p| p.records.len()).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
}

#[test]
fn oversized_record_gets_its_own_part() {
    let big = "x".repeat(100);
    let set = RecordSet::from_rows(&["title"], vec![vec!["small"], vec![big.as_str()], vec!["tail"]]);
    let parts = plan_partitions(&set, "out", 50, &SilentProgress).unwrap();
    let rows: Vec<Vec<usize>> = parts.iter().map(|p| p.records.iter().map(|r| r.row).collect()).collect();
    assert_eq!(rows, vec![vec![0, 1], vec![2]]);
}

/// Every record lands in exactly one part, in input order, as the same handle.
#[test]
fn partitioning_conserves_records_and_order() {
    let set = ten_byte_rows(37);
    for budget in [1u64, 9, 10, 11, 64, 1_000_000] {
        let parts = plan_partitions(&set, "out", budget, &SilentProgress).unwrap();
        let flat: Vec<&Arc<Record>> = parts.iter().flat_map(|p| p.records.iter()).collect();
        assert_eq!(flat.len(), set.len(), "budget {}", budget);
        assert!(flat.iter().zip(set.iter()).all(|(a, b)| Arc::ptr_eq(a, b)), "budget {}", budget);
        assert!(parts.iter().all(|p| !p.records.is_empty()));
    }
}

/// Parts are numbered 1..=N without gaps and named `{base}_parte_{N}.csv`.
#[test]
fn part_names_are_sequential() {
    let set = ten_byte_rows(12);
    let parts = plan_partitions(&set, "artigos", 1, &SilentProgress).unwrap();
    assert_eq!(parts.len(), 12);
    for (i, p) in parts.iter().enumerate() {
        assert_eq!(p.number, i + 1);
        assert_eq!(p.file_name, format!("artigos_parte_{}.csv", i + 1));
        assert_eq!(p.file_name, part_file_name("artigos", i + 1));
    }
}

#[test]
fn generous_budget_yields_one_part() {
    let set = ten_byte_rows(5);
    let parts = plan_partitions(&set, "out", 90 * 1024 * 1024, &SilentProgress).unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].file_name, "out_parte_1.csv");
    assert_eq!(parts[0].records.len(), 5);
    assert_eq!(parts[0].estimated_bytes, 50);
}

#[test]
fn empty_set_yields_no_parts() {
    let set = ten_byte_rows(0);
    let parts = plan_partitions(&set, "out", 10, &SilentProgress).unwrap();
    assert!(parts.is_empty());
}

#[test]
fn partitioning_reports_progress() {
    let sink = RecordingProgress::default();
    let set = ten_byte_rows(4);
    let _ = plan_partitions(&set, "out", 15, &sink).unwrap();
    let events = sink.events.lock().unwrap().clone();
    assert_eq!(events[0], "begin Splitting files 4");
    assert_eq!(events.last().unwrap(), "finish 2 part(s) planned");
}
