use tabular_ingest::ingestion::csv::{ingest_csv_from_bytes, ingest_csv_from_path, ingest_csv_from_reader, CsvOptions};
use tabular_ingest::types::{RowSet, Value};
use tabular_ingest::ErrorKind;

fn utf8(s: &str) -> Value {
    Value::Utf8(s.to_string())
}

fn wine_expected() -> RowSet {
    RowSet::new(
        vec!["alcohol".to_string(), "quality".to_string()],
        vec![vec![utf8("9.4"), utf8("6")], vec![utf8("9.8"), utf8("5")]],
    )
}

#[test]
fn ingest_csv_with_bom_matches_expected_rows() {
    let rs = ingest_csv_from_path("tests/fixtures/wine_bom.csv", &CsvOptions::default()).unwrap();
    assert_eq!(rs, wine_expected());

    let json = serde_json::to_string(&rs).unwrap();
    assert_eq!(
        json,
        r#"[{"alcohol":"9.4","quality":"6"},{"alcohol":"9.8","quality":"5"}]"#
    );
}

#[test]
fn bom_stripping_is_lossless() {
    let body = "品名,數量\n\"紅酒, 陳年\",6\n白酒,5\n";
    let mut with_bom = vec![0xEF, 0xBB, 0xBF];
    with_bom.extend_from_slice(body.as_bytes());

    let a = ingest_csv_from_bytes(&with_bom, &CsvOptions::default()).unwrap();
    let b = ingest_csv_from_bytes(body.as_bytes(), &CsvOptions::default()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.columns()[0], "品名");
}

#[test]
fn big5_without_bom_recovers_original_characters() {
    let text = "品名,數量\n紅酒,6\n中文測試,5\n";
    let (bytes, _, unmappable) = encoding_rs::BIG5.encode(text);
    assert!(!unmappable);
    assert!(std::str::from_utf8(&bytes).is_err());

    let rs = ingest_csv_from_bytes(&bytes, &CsvOptions::default()).unwrap();
    assert_eq!(rs.columns(), &["品名".to_string(), "數量".to_string()]);
    assert_eq!(rs.row(1).unwrap().get("品名"), Some(&utf8("中文測試")));
    for row in rs.rows() {
        for (_, v) in row.iter() {
            assert!(!v.to_string().contains('\u{FFFD}'));
        }
    }
}

#[test]
fn every_row_shares_header_keys_in_order() {
    let rs = ingest_csv_from_path("tests/fixtures/padded_headers.csv", &CsvOptions::default()).unwrap();
    assert_eq!(rs.row_count(), 3);
    for row in rs.rows() {
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["alcohol", "quality"]);
    }
}

#[test]
fn header_names_are_trimmed() {
    let rs = ingest_csv_from_path("tests/fixtures/padded_headers.csv", &CsvOptions::default()).unwrap();
    let row = rs.row(2).unwrap();
    assert_eq!(row.get("quality"), Some(&utf8("7")));
    assert_eq!(row.get(" quality "), None);
}

#[test]
fn header_only_csv_yields_no_rows() {
    let rs = ingest_csv_from_path("tests/fixtures/header_only.csv", &CsvOptions::default()).unwrap();
    assert!(rs.is_empty());
    assert_eq!(rs.columns(), &["alcohol".to_string(), "quality".to_string()]);
}

#[test]
fn empty_file_yields_empty_rowset() {
    let rs = ingest_csv_from_bytes(b"", &CsvOptions::default()).unwrap();
    assert_eq!(rs.row_count(), 0);
    assert_eq!(rs.column_count(), 0);
}

#[test]
fn quoted_fields_keep_commas_newlines_and_escaped_quotes() {
    let rs = ingest_csv_from_path("tests/fixtures/quoted.csv", &CsvOptions::default()).unwrap();
    assert_eq!(rs.row_count(), 2);
    let first = rs.row(0).unwrap();
    assert_eq!(first.get("name"), Some(&utf8("Smith, Ada")));
    assert_eq!(first.get("notes"), Some(&utf8("line one\nline two")));
    assert_eq!(rs.row(1).unwrap().get("notes"), Some(&utf8("said \"hi\"")));
}

#[test]
fn ragged_csv_fails_whole_ingestion() {
    let err = ingest_csv_from_path("tests/fixtures/ragged.csv", &CsvOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn ragged_csv_is_padded_in_flexible_mode() {
    let rs = ingest_csv_from_path("tests/fixtures/ragged.csv", &CsvOptions { flexible: true }).unwrap();
    assert_eq!(rs.row(1).unwrap().get("b"), Some(&utf8("")));
}

#[test]
fn missing_file_is_io_error() {
    let err = ingest_csv_from_path("tests/fixtures/does_not_exist.csv", &CsvOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn ingest_csv_from_reader_uses_reader_configuration() {
    let input = "id;name\n1;Ada\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .from_reader(input.as_bytes());

    let rs = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(rs.row(0).unwrap().get("name"), Some(&utf8("Ada")));
}

#[test]
fn headers_colliding_after_trim_get_unique_keys() {
    let rs = ingest_csv_from_bytes(b"a, a\n1,2\n", &CsvOptions::default()).unwrap();
    assert_eq!(rs.columns(), &["a".to_string(), "a_1".to_string()]);

    let row = rs.row(0).unwrap();
    assert_eq!(row.get("a"), Some(&utf8("1")));
    assert_eq!(row.get("a_1"), Some(&utf8("2")));

    let json: serde_json::Value = serde_json::to_value(&rs).unwrap();
    assert_eq!(json, serde_json::json!([{ "a": "1", "a_1": "2" }]));
}
