#[path = "common/mod.rs"]
mod common;

use common::*;
use refdedup::{remove_abstract_duplicates, remove_exact_duplicates, RecordSet};
use std::sync::Arc;

/// Exact matching compares raw values byte-for-byte: case and surrounding
/// whitespace make values distinct. The first occurrence wins.
#[test]
fn exact_match_is_byte_for_byte() {
    let set = titles(&["Foo", "foo", "Foo ", "Foo", "foo"]);
    let out = remove_exact_duplicates(&set, "title");
    assert_eq!(rows_of(&out), vec![0, 1, 2]);
}

#[test]
fn exact_match_is_idempotent() {
    let set = titles(&["a", "b", "a", "c", "b", "", ""]);
    let once = remove_exact_duplicates(&set, "title");
    let twice = remove_exact_duplicates(&once, "title");
    assert_eq!(rows_of(&once), rows_of(&twice));
    assert!(once.iter().zip(twice.iter()).all(|(a, b)| Arc::ptr_eq(a, b)));
}

/// Known quirk, kept on purpose: all missing values count as one shared value,
/// so only the first record without a title survives.
#[test]
fn missing_values_collapse_to_one() {
    let set = titles(&["", "A", "", ""]);
    let out = remove_exact_duplicates(&set, "title");
    assert_eq!(rows_of(&out), vec![0, 1]);
}

/// The same quirk on abstracts: many records legitimately lack one, yet only the
/// first of them is kept.
#[test]
fn abstract_stage_collapses_missing_abstracts() {
    let set = RecordSet::from_rows(
        &["title", "abstract"],
        vec![
            vec!["t1", "x"],
            vec!["t2", ""],
            vec!["t3", ""],
            vec!["t4", "x"],
            vec!["t5", "y"],
        ],
    );
    let out = remove_abstract_duplicates(&set, "abstract", true);
    assert_eq!(rows_of(&out), vec![0, 1, 4]);
}

/// Without an abstract column in the loaded data the stage hands back the very
/// same records, in the same order.
#[test]
fn abstract_stage_without_column_is_identity() {
    let set = titles(&["a", "b", "c"]);
    let out = remove_abstract_duplicates(&set, "abstract", false);
    assert_eq!(out.len(), set.len());
    assert!(out.iter().zip(set.iter()).all(|(a, b)| Arc::ptr_eq(a, b)));
}

/// Surviving records are the input's own handles, in input order.
#[test]
fn exact_match_keeps_identity_and_order() {
    let set = titles(&["b", "a", "b", "c", "a"]);
    let out = remove_exact_duplicates(&set, "title");
    assert_eq!(title_values(&out), vec!["b", "a", "c"]);
    assert!(Arc::ptr_eq(&out.records()[0], &set.records()[0]));
    assert!(Arc::ptr_eq(&out.records()[1], &set.records()[1]));
    assert!(Arc::ptr_eq(&out.records()[2], &set.records()[3]));
}

/// In-memory rows are fitted to the header: a short row gains missing values and
/// extra trailing fields are dropped.
#[test]
fn from_rows_fits_rows_to_the_header() {
    let set = RecordSet::from_rows(
        &["title", "abstract"],
        vec![vec!["a", "x", "extra", "more"], vec!["b"]],
    );
    assert_eq!(set.schema().len(), 2);
    assert!(set.iter().all(|r| r.values.len() == 2));
    assert_eq!(set.column_values("abstract"), vec![Some("x"), None]);
    assert_eq!(title_values(&set), vec!["a", "b"]);
}
