#![cfg(feature = "excel")]

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::error::IngestionResult;
use crate::types::{RowSet, Value};

/// Floats with a magnitude below 2^53 convert to `i64` without losing precision.
const MAX_SAFE_INTEGER_F64: f64 = 9_007_199_254_740_992.0;

/// Ingest the first sheet of a workbook (`.xlsx` or `.xls`) into an in-memory [`RowSet`].
///
/// Behavior:
/// - The file is read into memory and the workbook type is sniffed from its content, so a
///   workbook saved under the "wrong" spreadsheet extension still opens
/// - Only the first sheet is read (selected by position, not by name)
/// - The first row of the sheet's used range is the header; names are trimmed
/// - Rows where every cell is empty are skipped
/// - Whole-number float cells (below 2^53 in magnitude) become [`Value::Int64`]
/// - A workbook with no sheets, or an empty first sheet, yields an empty `RowSet`
pub fn ingest_excel_from_path(path: impl AsRef<Path>) -> IngestionResult<RowSet> {
    let bytes = std::fs::read(path)?;
    ingest_excel_from_bytes(bytes)
}

/// Ingest the first sheet of an in-memory workbook.
pub fn ingest_excel_from_bytes(bytes: Vec<u8>) -> IngestionResult<RowSet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(RowSet::default()),
    };
    Ok(rowset_from_range(&range))
}

fn rowset_from_range(range: &Range<Data>) -> RowSet {
    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return RowSet::default();
    };

    let columns: Vec<String> = header
        .iter()
        .map(|c| cell_to_header_string(c).trim().to_owned())
        .collect();

    let rows: Vec<Vec<Value>> = sheet_rows
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|row| {
            (0..columns.len())
                .map(|idx| convert_cell(row.get(idx).unwrap_or(&Data::Empty)))
                .collect()
        })
        .collect();

    RowSet::new(columns, rows)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => match whole_number(*f) {
            Some(i) => i.to_string(),
            None => f.to_string(),
        },
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => whole_number(*f).map_or(Value::Float64(*f), Value::Int64),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::Utf8(s.clone()),
        Data::DateTime(dt) => Value::Float64(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
        Data::Error(_) => Value::Utf8(c.to_string()),
    }
}

fn whole_number(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER_F64).then_some(f as i64)
}
