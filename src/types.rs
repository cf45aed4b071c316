//! Core data model types for ingestion.
//!
//! Every ingestion call produces a fresh [`RowSet`]: one shared, ordered list of column names plus
//! row-major [`Value`] storage. [`Row`] is a borrowed view that behaves like an ordered mapping
//! from column name to value.

use std::collections::HashSet;
use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A single cell value.
///
/// CSV cells are always [`Value::Utf8`] (the raw text of the field). Spreadsheet cells keep the
/// type of the source cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Empty spreadsheet cell.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Numeric view of this value, if it has one.
    ///
    /// Strings are parsed after trimming, so `" 9.4 "` is numeric. Booleans and nulls are not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) if v.is_finite() => Some(*v),
            Value::Utf8(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Borrow the string payload, if this is a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

/// In-memory result of parsing one tabular file.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as [`RowSet::columns`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// Create a row set from column names and rows.
    ///
    /// Repeated column names are made unique: the first keeps its name, later ones get `_1`,
    /// `_2`, ... appended (see [`unique_column_names`]).
    ///
    /// # Panics
    ///
    /// Panics if any row has a different length than `columns`.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        for (idx, row) in rows.iter().enumerate() {
            assert!(
                row.len() == width,
                "row {idx} has {} values but there are {width} columns",
                row.len()
            );
        }
        Self {
            columns: unique_column_names(columns),
            rows,
        }
    }

    /// A row set with columns but no rows (header-only input).
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns: unique_column_names(columns),
            rows: Vec::new(),
        }
    }

    /// Column names, in source header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of the column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow row `idx` as a mapping.
    pub fn row(&self, idx: usize) -> Option<Row<'_>> {
        self.rows.get(idx).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Iterate rows in source order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Raw row-major storage.
    pub fn values(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Iterate one column's values in row order.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Consume the row set, returning `(columns, rows)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}

impl Serialize for RowSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// One row of a [`RowSet`], viewed as an ordered mapping from column name to value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Value for column `name`.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let idx = self.columns.iter().position(|c| c == name)?;
        self.values.get(idx)
    }

    /// Column names of this row, in order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.columns.iter().map(String::as_str)
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Make header names unique, keeping their order.
///
/// The first occurrence of a name is kept as-is; each later occurrence gets the smallest `_N`
/// suffix (starting at 1) that is not already taken, so `["a", "a", "a_1"]` becomes
/// `["a", "a_1", "a_1_1"]`.
pub fn unique_column_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut unique = name.clone();
        let mut n = 0usize;
        while taken.contains(&unique) {
            n += 1;
            unique = format!("{name}_{n}");
        }
        taken.insert(unique.clone());
        out.push(unique);
    }
    out
}
