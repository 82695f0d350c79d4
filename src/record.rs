//! In-memory record model: a shared column schema plus ordered, immutable rows.

use ahash::AHashMap;
use std::sync::Arc;

/// Ordered, case-sensitive column names with O(1) lookup by name.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    columns: Vec<String>,
    index: AHashMap<String, usize>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::default();
        for c in columns {
            schema.push_if_absent(c.into());
        }
        schema
    }

    /// Append `column` unless it is already present. Returns its position.
    pub fn push_if_absent(&mut self, column: String) -> usize {
        if let Some(&i) = self.index.get(&column) {
            return i;
        }
        let i = self.columns.len();
        self.index.insert(column.clone(), i);
        self.columns.push(column);
        i
    }

    #[inline]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    #[inline]
    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for Schema {}

/// One source row. `values` is aligned with the owning set's schema;
/// `None` marks a missing value (empty field or column absent in the source file).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub row: usize,
    pub values: Vec<Option<String>>,
}

impl Record {
    pub fn new(row: usize, values: Vec<Option<String>>) -> Self {
        Self { row, values }
    }

    #[inline]
    pub fn value(&self, pos: usize) -> Option<&str> {
        self.values.get(pos).and_then(|v| v.as_deref())
    }
}

/// Ordered set of shared record handles. Filtering stages build new sets
/// that hold the same `Arc`s, so identity survives across stages.
#[derive(Clone, Debug)]
pub struct RecordSet {
    schema: Arc<Schema>,
    records: Vec<Arc<Record>>,
}

impl RecordSet {
    pub fn new(schema: Arc<Schema>, records: Vec<Arc<Record>>) -> Self {
        Self { schema, records }
    }

    /// Build a set from plain string rows; empty strings load as missing values.
    /// Handy for headless callers that already hold their data in memory.
    ///
    /// Every row is fitted to `columns`: short rows are padded with missing values
    /// and fields past the last column are dropped. Unlike file loading, a long row
    /// is not an error here.
    pub fn from_rows<I, R, S>(columns: &[&str], rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let schema = Arc::new(Schema::new(columns.iter().copied()));
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, values)| {
                let mut values: Vec<Option<String>> = values
                    .into_iter()
                    .map(|v| {
                        let v = v.as_ref();
                        if v.is_empty() { None } else { Some(v.to_string()) }
                    })
                    .collect();
                values.resize(schema.len(), None);
                Arc::new(Record::new(row, values))
            })
            .collect();
        Self { schema, records }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.records.iter()
    }

    /// Values of `column` in record order (`None` for missing values or an unknown column).
    pub fn column_values(&self, column: &str) -> Vec<Option<&str>> {
        match self.schema.position(column) {
            Some(pos) => self.records.iter().map(|r| r.value(pos)).collect(),
            None => vec![None; self.records.len()],
        }
    }

    /// New set with the same schema, keeping the records for which `keep` returns true.
    pub fn retain_by<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Record) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|r| keep(r))
            .cloned()
            .collect();
        Self { schema: Arc::clone(&self.schema), records }
    }
}
