#![cfg(feature = "excel")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rust_xlsxwriter::Workbook;
use tabular_ingest::ingestion::excel::{ingest_excel_from_bytes, ingest_excel_from_path};
use tabular_ingest::ingestion::ingest;
use tabular_ingest::types::Value;
use tabular_ingest::ErrorKind;

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-ingest-{name}-{nanos}.{ext}"))
}

fn write_ab_workbook(path: &PathBuf) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Sheet1").unwrap();
    ws.write_string(0, 0, "A").unwrap();
    ws.write_string(0, 1, "B").unwrap();
    ws.write_number(1, 0, 1).unwrap();
    ws.write_number(1, 1, 2).unwrap();
    wb.save(path).unwrap();
}

fn write_two_sheet_workbook(path: &PathBuf) {
    let mut wb = Workbook::new();

    let ws1 = wb.add_worksheet();
    ws1.set_name("Sales").unwrap();
    ws1.write_string(0, 0, " region ").unwrap();
    ws1.write_string(0, 1, "amount").unwrap();
    ws1.write_string(0, 2, "closed").unwrap();
    ws1.write_string(1, 0, "north").unwrap();
    ws1.write_number(1, 1, 12.5).unwrap();
    ws1.write_boolean(1, 2, true).unwrap();
    ws1.write_string(2, 0, "south").unwrap();
    ws1.write_boolean(2, 2, false).unwrap();

    let ws2 = wb.add_worksheet();
    ws2.set_name("Ignored").unwrap();
    ws2.write_string(0, 0, "other").unwrap();
    ws2.write_number(1, 0, 99).unwrap();

    wb.save(path).unwrap();
}

#[test]
fn xls_extension_first_sheet_reads_whole_numbers_as_integers() {
    let path = tmp_file("ab", "xls");
    write_ab_workbook(&path);

    let rs = ingest(&path, ".xls").unwrap();
    assert_eq!(rs.columns(), &["A".to_string(), "B".to_string()]);
    assert_eq!(rs.row_count(), 1);
    let row = rs.row(0).unwrap();
    assert_eq!(row.get("A"), Some(&Value::Int64(1)));
    assert_eq!(row.get("B"), Some(&Value::Int64(2)));
    assert_eq!(serde_json::to_string(&rs).unwrap(), r#"[{"A":1,"B":2}]"#);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn only_first_sheet_is_read_and_headers_are_trimmed() {
    let path = tmp_file("two-sheets", "xlsx");
    write_two_sheet_workbook(&path);

    let rs = ingest_excel_from_path(&path).unwrap();
    assert_eq!(
        rs.columns(),
        &["region".to_string(), "amount".to_string(), "closed".to_string()]
    );
    assert_eq!(rs.row_count(), 2);
    assert_eq!(rs.row(0).unwrap().get("amount"), Some(&Value::Float64(12.5)));
    assert_eq!(rs.row(0).unwrap().get("closed"), Some(&Value::Bool(true)));
    assert_eq!(rs.row(1).unwrap().get("amount"), Some(&Value::Null));
    assert_eq!(
        rs.row(1).unwrap().get("region"),
        Some(&Value::Utf8("south".to_string()))
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn empty_first_sheet_yields_empty_rowset() {
    let mut wb = Workbook::new();
    wb.add_worksheet();
    let bytes = wb.save_to_buffer().unwrap();

    let rs = ingest_excel_from_bytes(bytes).unwrap();
    assert!(rs.is_empty());
    assert_eq!(rs.column_count(), 0);
}

#[test]
fn corrupt_workbook_is_parse_error() {
    let path = tmp_file("corrupt", "xlsx");
    std::fs::write(&path, b"definitely not a workbook").unwrap();

    let err = ingest(&path, "xlsx").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn repeated_header_in_sheet_gets_unique_keys() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "A").unwrap();
    ws.write_string(0, 1, "A").unwrap();
    ws.write_number(1, 0, 1).unwrap();
    ws.write_number(1, 1, 2).unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let rs = ingest_excel_from_bytes(bytes).unwrap();
    assert_eq!(rs.columns(), &["A".to_string(), "A_1".to_string()]);
    assert_eq!(serde_json::to_string(&rs).unwrap(), r#"[{"A":1,"A_1":2}]"#);
}
