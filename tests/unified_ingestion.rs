use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tabular_ingest::ingestion::{ingest, ingest_from_path, IngestionFormat, IngestionOptions, IngestionRequest};
use tabular_ingest::types::Value;
use tabular_ingest::{ErrorKind, IngestionError};

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-ingest-unified-{nanos}.{ext}"))
}

#[test]
fn ingest_dispatches_csv_by_declared_extension() {
    let rs = ingest("tests/fixtures/wine_bom.csv", ".CSV").unwrap();
    assert_eq!(rs.row_count(), 2);
    assert_eq!(
        rs.row(0).unwrap().get("alcohol"),
        Some(&Value::Utf8("9.4".to_string()))
    );
}

#[test]
fn txt_extension_is_unsupported_and_file_is_not_read() {
    let err = ingest("tests/fixtures/does_not_exist.txt", ".txt").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert!(matches!(err, IngestionError::UnsupportedFormat { .. }));
}

#[test]
fn declared_extension_wins_over_path_extension() {
    let path = tmp_file("upload");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    let rs = ingest(&path, "csv").unwrap();
    assert_eq!(rs.row_count(), 1);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_from_path_infers_format_from_extension() {
    let rs = ingest_from_path("tests/fixtures/wine.csv", &IngestionOptions::default()).unwrap();
    assert_eq!(rs.row_count(), 2);

    let err = ingest_from_path("tests/fixtures/notes.txt", &IngestionOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
}

#[test]
fn forced_format_overrides_inference() {
    let path = tmp_file("bin");
    std::fs::write(&path, "x\n1\n").unwrap();

    let opts = IngestionOptions {
        format: Some(IngestionFormat::Csv),
        ..Default::default()
    };
    let rs = ingest_from_path(&path, &opts).unwrap();
    assert_eq!(rs.columns(), &["x".to_string()]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_is_io_error() {
    let err = ingest("tests/fixtures/does_not_exist.csv", "csv").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn reingesting_the_same_file_concurrently_gives_equal_results() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| ingest("tests/fixtures/padded_headers.csv", "csv").unwrap()))
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for rs in &results[1..] {
        assert_eq!(rs, &results[0]);
    }
}

#[test]
fn ingestion_request_runs_with_declared_format() {
    let req = IngestionRequest::new("tests/fixtures/wine.csv", "csv").unwrap();
    assert_eq!(req.run().unwrap().row_count(), 2);

    let err = IngestionRequest::new("tests/fixtures/wine.csv", "json").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
}
