//! `tabular-ingest` turns uploaded tabular files into an in-memory [`types::RowSet`]: an ordered
//! list of rows, each an ordered mapping from trimmed column name to [`types::Value`].
//!
//! The primary entrypoint is [`ingestion::ingest`], which selects the CSV or spreadsheet branch
//! from the declared file extension.
//!
//! ## What you can ingest
//!
//! - **CSV**: `.csv`. The whole file is read and decoded before tokenizing:
//!   - a leading UTF-8 byte-order mark is stripped and the rest decoded as UTF-8
//!   - without a BOM, input that is not valid UTF-8 is decoded as Big5 (see
//!     [`ingestion::encoding`])
//!   - comma-delimited, double-quote quoting, newlines allowed inside quoted fields
//!   - header names are trimmed; cell values are kept verbatim as strings
//! - **Excel workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`. Only the first
//!   sheet is read; numeric, boolean and string cells keep their type.
//!
//! Any other extension fails with [`IngestionError::UnsupportedFormat`].
//!
//! ## Quick example
//!
//! ```no_run
//! use tabular_ingest::ingestion::ingest;
//!
//! # fn main() -> Result<(), tabular_ingest::IngestionError> {
//! let rows = ingest("wine.csv", "csv")?;
//! println!("rows={} columns={:?}", rows.row_count(), rows.columns());
//! # Ok(())
//! # }
//! ```
//!
//! ## Uploads
//!
//! [`uploads::UploadStore`] keeps raw files on disk, ingests them on upload and re-ingests them on
//! every reload (parsed rows are never cached):
//!
//! ```no_run
//! use tabular_ingest::uploads::{UploadOptions, UploadStore};
//!
//! # fn main() -> Result<(), tabular_ingest::IngestionError> {
//! let store = UploadStore::open("uploads", UploadOptions::default())?;
//! let stored = store.store("wine.csv", b"alcohol,quality\n9.4,6\n")?;
//! let body = serde_json::to_string(&store.preview(&stored.rows)).unwrap();
//! println!("{body}");
//!
//! let again = store.reload(&stored.record)?;
//! assert_eq!(again.row_count(), stored.record.row_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified ingestion entrypoints and format-specific implementations
//! - [`types`]: row set data model
//! - [`processing`]: column statistics and bounded previews
//! - [`uploads`]: on-disk upload store
//! - [`error`]: error types used across the crate

pub mod error;
pub mod ingestion;
pub mod processing;
pub mod types;
pub mod uploads;

pub use error::{ErrorKind, IngestionError, IngestionResult};
