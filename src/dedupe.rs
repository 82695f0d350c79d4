//! Near-duplicate filters. Every stage consumes a record set and returns a new,
//! order-preserving subset; no record is modified.

use crate::progress::{ProgressScope, ProgressSink};
use crate::record::RecordSet;
use ahash::AHashSet;

/// Keep the first record per distinct raw value of `column`.
///
/// Values are compared byte-for-byte (no trimming or case folding). Missing
/// values all share one key, so only the first record without a value survives.
/// An unknown column behaves like a column of missing values.
pub fn remove_exact_duplicates(set: &RecordSet, column: &str) -> RecordSet {
    let pos = set.schema().position(column);
    let mut seen: AHashSet<Option<&str>> = AHashSet::with_capacity(set.len());
    let mut keep = Vec::with_capacity(set.len());
    for rec in set.iter() {
        let key = pos.and_then(|p| rec.value(p));
        keep.push(seen.insert(key));
    }
    let mut flags = keep.into_iter();
    set.retain_by(|_| flags.next().unwrap_or(false))
}

/// Which token to drop when building a title key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordPosition {
    First,
    Last,
    Second,
    /// Token at `token_count / 2`.
    Middle,
}

impl WordPosition {
    /// The fixed order in which the stages are chained.
    pub const CHAIN: [WordPosition; 4] =
        [WordPosition::First, WordPosition::Last, WordPosition::Second, WordPosition::Middle];

    /// Fewest tokens a title needs before this position is removed;
    /// shorter titles pass through the stage untouched.
    pub fn min_tokens(self) -> usize {
        match self {
            WordPosition::First | WordPosition::Last => 1,
            WordPosition::Second => 2,
            WordPosition::Middle => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WordPosition::First => "remove first word",
            WordPosition::Last => "remove last word",
            WordPosition::Second => "remove second word",
            WordPosition::Middle => "remove middle word",
        }
    }
}

/// Title key for `title`: trimmed, whitespace-tokenized, one token removed at `position`,
/// re-joined with single spaces. `None` if the title is too short for `position`.
pub fn title_key(title: &str, position: WordPosition) -> Option<String> {
    let tokens: Vec<&str> = title.split_whitespace().collect();
    let n = tokens.len();
    if n < position.min_tokens() {
        return None;
    }
    let skip = match position {
        WordPosition::First => 0,
        WordPosition::Last => n - 1,
        WordPosition::Second => 1,
        WordPosition::Middle => n / 2,
    };
    let kept: Vec<&str> = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, t)| *t)
        .collect();
    Some(kept.join(" "))
}

/// Drop records whose [`title_key`] at `position` was already seen earlier in this same call.
///
/// Only keys are compared: "Study of X" after "A Study of X" at the first-word position
/// has key "of X", not "Study of X", so both stay.
/// Records whose title is missing or too short for `position` are always kept and
/// never enter the seen set.
pub fn remove_word_and_compare(
    set: &RecordSet,
    column: &str,
    position: WordPosition,
    sink: &dyn ProgressSink,
) -> RecordSet {
    let pos = set.schema().position(column);
    let pb = ProgressScope::count(sink, format!("Word removal: {}", position.label()), set.len() as u64);

    let mut seen: AHashSet<String> = AHashSet::with_capacity(set.len());
    let mut dropped = 0u64;
    let out = set.retain_by(|rec| {
        pb.inc_items(1);
        let Some(title) = pos.and_then(|p| rec.value(p)) else { return true };
        let Some(key) = title_key(title, position) else { return true };
        if !seen.insert(key) {
            dropped += 1;
            return false;
        }
        true
    });

    pb.finish(format!("{}: {} dropped", position.label(), dropped));
    out
}

/// Apply the four word-removal stages in their fixed order, each on the previous output.
pub fn remove_word_variants(set: &RecordSet, column: &str, sink: &dyn ProgressSink) -> Vec<(WordPosition, RecordSet)> {
    let mut current = set.clone();
    let mut out = Vec::with_capacity(WordPosition::CHAIN.len());
    for position in WordPosition::CHAIN {
        current = remove_word_and_compare(&current, column, position, sink);
        out.push((position, current.clone()));
    }
    out
}

/// Exact-match dedupe on `column`, only when `present_in_source` is true;
/// otherwise the input set is returned unchanged (same handles, same order).
pub fn remove_abstract_duplicates(set: &RecordSet, column: &str, present_in_source: bool) -> RecordSet {
    if present_in_source {
        remove_exact_duplicates(set, column)
    } else {
        set.clone()
    }
}
