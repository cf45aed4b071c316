//! CSV ingestion implementation.

use std::path::Path;

use crate::error::IngestionResult;
use crate::types::{RowSet, Value};

use super::encoding::{decode_csv_bytes, EncodingDecision};

/// Options for the CSV branch.
///
/// The dialect itself is fixed: comma-delimited, double-quote quoting, newlines allowed inside
/// quoted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CsvOptions {
    /// Accept records whose field count differs from the header.
    ///
    /// Short records are padded with empty strings and long records are truncated to the header
    /// width. When `false` (default) such a record aborts ingestion with a CSV error.
    pub flexible: bool,
}

/// Ingest a CSV file into an in-memory [`RowSet`].
///
/// Rules:
///
/// - The whole file is read and decoded first (see [`super::encoding`]).
/// - The first record is the header; each name is trimmed.
/// - Every following record becomes one row of raw string values, in file order.
/// - Blank lines are skipped.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, options: &CsvOptions) -> IngestionResult<RowSet> {
    read_csv_path(path.as_ref(), options).map(|(rows, _)| rows)
}

/// Same as [`ingest_csv_from_path`], also returning the encoding that was applied.
pub(crate) fn read_csv_path(
    path: &Path,
    options: &CsvOptions,
) -> IngestionResult<(RowSet, EncodingDecision)> {
    let bytes = std::fs::read(path)?;
    let decoded = decode_csv_bytes(&bytes);
    let rows = ingest_csv_from_str(&decoded.text, options)?;
    Ok((rows, decoded.encoding))
}

/// Ingest an in-memory CSV buffer, applying BOM and Big5 detection.
pub fn ingest_csv_from_bytes(bytes: &[u8], options: &CsvOptions) -> IngestionResult<RowSet> {
    let decoded = decode_csv_bytes(bytes);
    ingest_csv_from_str(&decoded.text, options)
}

/// Ingest already-decoded CSV text.
pub fn ingest_csv_from_str(text: &str, options: &CsvOptions) -> IngestionResult<RowSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(options.flexible)
        .from_reader(text.as_bytes());
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader must be configured with headers. If it is flexible, ragged records are padded or
/// truncated to the header width.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<RowSet> {
    let columns: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
    let width = columns.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Vec<Value> = (0..width)
            .map(|idx| Value::Utf8(record.get(idx).unwrap_or("").to_owned()))
            .collect();
        rows.push(row);
    }

    Ok(RowSet::new(columns, rows))
}

fn normalize_header(raw: &str) -> String {
    raw.trim().to_owned()
}
