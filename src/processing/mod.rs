//! Consumers of an ingested [`crate::types::RowSet`].
//!
//! Currently implemented:
//!
//! - [`summarize()`]: per-column numeric statistics (count/mean/median/std dev/min/max/range)
//! - [`preview()`]: the bounded prefix of rows sent to the browser
//!
//! ## Example: ingest → summarize → preview
//!
//! ```rust
//! use tabular_ingest::ingestion::csv::{ingest_csv_from_str, CsvOptions};
//! use tabular_ingest::processing::{preview, summarize};
//!
//! let rows = ingest_csv_from_str("alcohol,quality\n9.4,6\n9.8,5\n", &CsvOptions::default()).unwrap();
//!
//! let stats = summarize(&rows);
//! assert_eq!(stats.get("quality").unwrap().mean, 5.5);
//!
//! let head = preview(&rows, 1);
//! assert_eq!(head.row_count, 2);
//! assert_eq!(head.data.len(), 1);
//! ```

pub mod preview;
pub mod summary;

pub use preview::{preview, RowSetPreview, DEFAULT_PREVIEW_ROWS};
pub use summary::{numeric_columns, summarize, summarize_column, ColumnSummary, StatisticsReport};
