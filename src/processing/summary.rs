//! Per-column numeric statistics for a [`crate::types::RowSet`].

use rayon::prelude::*;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::types::RowSet;

/// Summary of the numeric values found in one column.
///
/// All figures are rounded to 4 decimal places. `std_dev` is the population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl ColumnSummary {
    /// Summarize a list of values. Returns all zeros for an empty list.
    pub fn from_values(mut values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        values.sort_by(f64::total_cmp);
        let count = values.len();
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let median = if count % 2 == 1 {
            values[count / 2]
        } else {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        };
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values[0];
        let max = values[count - 1];

        Self {
            count,
            mean: round4(mean),
            median: round4(median),
            std_dev: round4(variance.sqrt()),
            min: round4(min),
            max: round4(max),
            range: round4(max - min),
        }
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Statistics for every column of a row set, in column order.
///
/// Serializes as a JSON object keyed by column name, the shape handed to narrative-analysis
/// consumers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatisticsReport {
    pub columns: Vec<(String, ColumnSummary)>,
}

impl StatisticsReport {
    /// Summary for `column`, if present.
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|(name, _)| name == column).map(|(_, s)| s)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for StatisticsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, summary) in &self.columns {
            map.serialize_entry(name, summary)?;
        }
        map.end()
    }
}

/// Summarize every column of `rows`.
///
/// - Numeric values are `Int64`, `Float64`, and strings that parse as a number once trimmed.
/// - A column without numeric values gets an all-zero summary.
/// - An empty row set (no data rows) yields an empty report.
///
/// Columns are processed in parallel; the report keeps column order.
pub fn summarize(rows: &RowSet) -> StatisticsReport {
    if rows.is_empty() {
        return StatisticsReport::default();
    }

    let columns = rows
        .columns()
        .par_iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), ColumnSummary::from_values(numeric_values(rows, idx))))
        .collect();

    StatisticsReport { columns }
}

/// Summarize a single column by name.
///
/// Returns `None` if `column` does not exist.
pub fn summarize_column(rows: &RowSet, column: &str) -> Option<ColumnSummary> {
    let idx = rows.column_index(column)?;
    Some(ColumnSummary::from_values(numeric_values(rows, idx)))
}

/// Names of the columns that hold at least one numeric value, in column order.
pub fn numeric_columns(rows: &RowSet) -> Vec<&str> {
    rows.columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| rows.column_values(*idx).any(|v| v.as_f64().is_some()))
        .map(|(_, name)| name.as_str())
        .collect()
}

fn numeric_values(rows: &RowSet, idx: usize) -> Vec<f64> {
    rows.column_values(idx).filter_map(|v| v.as_f64()).collect()
}
