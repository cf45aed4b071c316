//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest`] or [`ingest_from_path`] (from [`unified`]) which:
//!
//! - select the CSV or spreadsheet branch by file extension
//! - materialize the whole file into an in-memory [`crate::types::RowSet`]
//! - optionally report success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`encoding`] (BOM / Big5 detection used by the CSV branch)
//! - `excel` (Cargo feature `excel`, on by default)

pub mod csv;
pub mod encoding;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use self::csv::CsvOptions;
pub use encoding::{decode_csv_bytes, detect_encoding, DecodedText, EncodingDecision};
pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, TracingObserver,
};
pub use unified::{ingest, ingest_from_path, IngestionFormat, IngestionOptions, IngestionRequest};
