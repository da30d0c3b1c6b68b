//! Row model for the editable grid.
//!
//! Rows are owned by the caller. The grid only ever hands back new
//! collections: [`Rows`] has no mutable accessors, and every update builds a
//! fresh collection that shares the untouched rows with its predecessor.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single cell value. An unset cell is the absence of its key in the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric value (number cells).
    Number(f64),
    /// Text value (text, dropdown and duration cells).
    Text(String),
}

impl CellValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Get the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    /// Get the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// One record: field key to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, CellValue>,
}

impl Row {
    /// Create a row with no fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Get a field value.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }

    /// Check whether a field is set.
    pub fn is_set(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field.
    pub fn set(&mut self, key: impl Into<String>, value: CellValue) {
        self.fields.insert(key.into(), value);
    }

    /// Unset a field.
    pub fn unset(&mut self, key: &str) {
        self.fields.remove(key);
    }

    /// Iterate over the set fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of set fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Immutable, cheaply clonable collection of rows.
///
/// Updates return a new `Rows`; rows that were not touched are shared with
/// the previous collection.
#[derive(Debug, Clone, Default)]
pub struct Rows {
    rows: Arc<[Arc<Row>]>,
}

impl Rows {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of real rows (the trailing template is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no real rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).map(|row| row.as_ref())
    }

    /// Iterate over the rows.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().map(|row| row.as_ref())
    }

    /// Whether both collections are the same allocation.
    pub fn ptr_eq(&self, other: &Rows) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }

    /// Whether row `index` is the very same row object in both collections.
    pub fn shares_row(&self, other: &Rows, index: usize) -> bool {
        match (self.rows.get(index), other.rows.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Return a copy with row `index` replaced.
    pub(crate) fn replace(&self, index: usize, row: Row) -> Rows {
        let mut next: Vec<Arc<Row>> = self.rows.to_vec();
        next[index] = Arc::new(row);
        Rows { rows: next.into() }
    }

    /// Return a copy with `row` appended.
    pub(crate) fn push(&self, row: Row) -> Rows {
        let mut next: Vec<Arc<Row>> = Vec::with_capacity(self.rows.len() + 1);
        next.extend(self.rows.iter().cloned());
        next.push(Arc::new(row));
        Rows { rows: next.into() }
    }

    /// Return a copy without row `index`.
    pub(crate) fn remove(&self, index: usize) -> Rows {
        let next: Vec<Arc<Row>> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, row)| Arc::clone(row))
            .collect();
        Rows { rows: next.into() }
    }
}

impl PartialEq for Rows {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        rows.into_iter().collect()
    }
}

impl FromIterator<Row> for Rows {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        let rows: Vec<Arc<Row>> = iter.into_iter().map(Arc::new).collect();
        Rows { rows: rows.into() }
    }
}

impl Serialize for Rows {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Rows {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Row>::deserialize(deserializer).map(Rows::from)
    }
}

/// A caller-supplied error marker for one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellError {
    /// Plain flag.
    Flag(bool),
    /// Error message; an empty message does not count as an error.
    Message(String),
}

impl CellError {
    /// Whether this marker flags the cell.
    pub fn is_set(&self) -> bool {
        match self {
            CellError::Flag(flag) => *flag,
            CellError::Message(msg) => !msg.is_empty(),
        }
    }
}

/// Per-row error markers, parallel to the row collection.
///
/// The grid never computes these itself; it only paints them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap {
    rows: Vec<BTreeMap<String, CellError>>,
}

impl ErrorMap {
    /// Create an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style marker insertion.
    pub fn with(mut self, row: usize, key: impl Into<String>, error: CellError) -> Self {
        self.mark(row, key, error);
        self
    }

    /// Mark a cell.
    pub fn mark(&mut self, row: usize, key: impl Into<String>, error: CellError) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, BTreeMap::new);
        }
        self.rows[row].insert(key.into(), error);
    }

    /// Whether the cell at (`row`, `key`) is flagged.
    pub fn is_flagged(&self, row: usize, key: &str) -> bool {
        self.rows
            .get(row)
            .and_then(|errors| errors.get(key))
            .is_some_and(CellError::is_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Rows {
        Rows::from(vec![
            Row::new().with("name", "Ada").with("age", 36.0),
            Row::new().with("name", "Linus"),
        ])
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(12.0).to_string(), "12");
        assert_eq!(CellValue::Number(12.3).to_string(), "12.3");
        assert_eq!(CellValue::text("IND").to_string(), "IND");
    }

    #[test]
    fn test_replace_shares_siblings() {
        let rows = sample();
        let next = rows.replace(0, Row::new().with("name", "Grace"));

        assert!(!rows.ptr_eq(&next));
        assert!(next.shares_row(&rows, 1));
        assert!(!next.shares_row(&rows, 0));
        assert_eq!(rows.get(0).unwrap().get("name"), Some(&CellValue::text("Ada")));
    }

    #[test]
    fn test_push_appends_one() {
        let rows = sample();
        let next = rows.push(Row::new());
        assert_eq!(rows.len(), 2);
        assert_eq!(next.len(), 3);
        assert!(next.shares_row(&rows, 0));
        assert!(next.shares_row(&rows, 1));
    }

    #[test]
    fn test_remove_shifts_down() {
        let rows = Rows::from(vec![
            Row::new().with("n", 0.0),
            Row::new().with("n", 1.0),
            Row::new().with("n", 2.0),
        ]);
        let next = rows.remove(1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.get(0).unwrap().get("n"), Some(&CellValue::Number(0.0)));
        assert_eq!(next.get(1).unwrap().get("n"), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_rows_json_shape() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"[{"age":36.0,"name":"Ada"},{"name":"Linus"}]"#);

        let parsed: Rows = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_error_map_flags() {
        let errors = ErrorMap::new()
            .with(1, "age", CellError::Flag(true))
            .with(1, "name", CellError::Message(String::new()))
            .with(2, "name", CellError::Message("required".into()));

        assert!(!errors.is_flagged(0, "age"));
        assert!(errors.is_flagged(1, "age"));
        assert!(!errors.is_flagged(1, "name"));
        assert!(errors.is_flagged(2, "name"));
        assert!(!errors.is_flagged(9, "name"));
    }
}
