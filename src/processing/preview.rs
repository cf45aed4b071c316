//! Bounded-prefix view of a [`RowSet`] for browser payloads.

use serde::Serialize;

use crate::types::{Row, RowSet};

/// Rows forwarded to the browser after an upload or a history reload.
pub const DEFAULT_PREVIEW_ROWS: usize = 1000;

/// The first `limit` rows of a row set plus its full row count.
///
/// Serializes as `{"rowCount": .., "columns": [..], "data": [{..}, ..]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSetPreview<'a> {
    pub row_count: usize,
    pub columns: &'a [String],
    pub data: Vec<Row<'a>>,
}

impl RowSetPreview<'_> {
    /// `true` when some rows were left out of `data`.
    pub fn is_truncated(&self) -> bool {
        self.data.len() < self.row_count
    }
}

/// Borrow the first `limit` rows of `rows`.
pub fn preview(rows: &RowSet, limit: usize) -> RowSetPreview<'_> {
    RowSetPreview {
        row_count: rows.row_count(),
        columns: rows.columns(),
        data: rows.rows().take(limit).collect(),
    }
}
