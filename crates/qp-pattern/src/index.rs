use super::*;
use std::collections::BTreeMap;

/// One index that actually exists, keyed the same way as [`AccessPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexRecord {
    table: String,
    columns: Vec<String>,
}

impl IndexRecord {
    pub fn new<T, C>(table: T, columns: impl IntoIterator<Item = C>) -> Self
    where
        T: Into<String>,
        C: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
    pub fn table(&self) -> &str {
        &self.table
    }
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    /// True iff this index has exactly the pattern's table and column tuple.
    pub fn covers(&self, pattern: &AccessPattern) -> bool {
        self.table == pattern.table() && self.columns == pattern.columns()
    }
}

impl From<&AccessPattern> for IndexRecord {
    fn from(pattern: &AccessPattern) -> Self {
        Self::new(pattern.table(), pattern.columns().iter().cloned())
    }
}

impl std::fmt::Display for IndexRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.table, Tuple(&self.columns))
    }
}

/// Every real index an index source reported.
///
/// Several physical indexes may share one (table, columns) key; their names
/// are kept for diagnostics but never take part in matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSet(BTreeMap<IndexRecord, Vec<String>>);

impl IndexSet {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds a record, remembering the index name when the source has one.
    pub fn insert(&mut self, record: IndexRecord, name: Option<&str>) {
        let names = self.0.entry(record).or_default();
        if let Some(name) = name {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    /// Exact membership: same table and same columns in the same order.
    pub fn contains(&self, pattern: &AccessPattern) -> bool {
        self.0.contains_key(&IndexRecord::from(pattern))
    }
    /// Names of the physical indexes backing a pattern.
    pub fn names(&self, pattern: &AccessPattern) -> &[String] {
        self.0
            .get(&IndexRecord::from(pattern))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
    pub fn records(&self) -> impl Iterator<Item = &IndexRecord> {
        self.0.keys()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<IndexRecord> for IndexSet {
    fn from_iter<I: IntoIterator<Item = IndexRecord>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |mut set, record| {
            set.insert(record, None);
            set
        })
    }
}
