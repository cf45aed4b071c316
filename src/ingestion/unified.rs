//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest`] (explicit extension, as handed over by an upload form) or
//! [`ingest_from_path`] (extension inferred from the path, or forced via
//! [`IngestionOptions::format`]).
//!
//! - Unsupported extensions are rejected before the file is opened.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ErrorKind, IngestionError, IngestionResult};
use crate::types::RowSet;

use super::csv::{self, CsvOptions};
use super::encoding::EncodingDecision;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet workbooks, `.xlsx` and `.xls` (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension.
    ///
    /// Case-insensitive; a leading dot is accepted (`".CSV"` and `"csv"` both work).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format from the extension of `path`.
    pub fn from_path(path: &Path) -> IngestionResult<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).ok_or_else(|| {
            IngestionError::unsupported(format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ))
        })?;
        Self::from_extension(ext).ok_or_else(|| unsupported_extension(ext))
    }
}

fn unsupported_extension(ext: &str) -> IngestionError {
    IngestionError::unsupported(format!(
        "extension '{ext}' is not supported (expected .csv, .xlsx or .xls)"
    ))
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<IngestionFormat>,
    /// CSV-specific options.
    pub csv: CsvOptions,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("csv", &self.csv)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            csv: CsvOptions::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Ingest the file at `path`, choosing the branch from `extension`.
///
/// `extension` is the declared extension of the file (typically taken from the original upload
/// name, since stored files may be renamed). Anything other than `csv`, `xlsx` or `xls`
/// (case-insensitive, leading dot optional) fails with
/// [`IngestionError::UnsupportedFormat`] without touching the file.
///
/// ```no_run
/// use tabular_ingest::ingestion::ingest;
///
/// # fn main() -> Result<(), tabular_ingest::IngestionError> {
/// let rows = ingest("uploads/1700000000-wine.csv", ".csv")?;
/// for row in rows.rows() {
///     println!("{:?}", row.get("quality"));
/// }
/// # Ok(())
/// # }
/// ```
pub fn ingest(path: impl AsRef<Path>, extension: &str) -> IngestionResult<RowSet> {
    let format = IngestionFormat::from_extension(extension).ok_or_else(|| unsupported_extension(extension))?;
    let options = IngestionOptions {
        format: Some(format),
        ..Default::default()
    };
    ingest_from_path(path, &options)
}

/// Unified ingestion entry point for path-based sources.
///
/// - If `options.format` is `None`, format is inferred from the file extension.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column counts and the CSV encoding decision
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ## Observability (tracing + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use tabular_ingest::ingestion::{
///     ingest_from_path, IngestionOptions, IngestionSeverity, TracingObserver,
/// };
///
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     alert_at_or_above: IngestionSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
/// let _err = ingest_from_path("does_not_exist.csv", &opts).unwrap_err();
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<RowSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => IngestionFormat::from_path(path)?,
    };

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = dispatch(path, fmt, options);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok((rows, encoding)) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: rows.row_count(),
                    columns: rows.column_count(),
                    encoding: *encoding,
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result.map(|(rows, _)| rows)
}

fn dispatch(
    path: &Path,
    fmt: IngestionFormat,
    options: &IngestionOptions,
) -> IngestionResult<(RowSet, Option<EncodingDecision>)> {
    match fmt {
        IngestionFormat::Csv => {
            let (rows, encoding) = csv::read_csv_path(path, &options.csv)?;
            Ok((rows, Some(encoding)))
        }
        IngestionFormat::Excel => ingest_excel_dispatch(path).map(|rows| (rows, None)),
    }
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e.kind() {
        ErrorKind::Io => IngestionSeverity::Critical,
        ErrorKind::Parse | ErrorKind::UnsupportedFormat => IngestionSeverity::Error,
    }
}

fn ingest_excel_dispatch(path: &Path) -> IngestionResult<RowSet> {
    #[cfg(feature = "excel")]
    {
        super::excel::ingest_excel_from_path(path)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestionError::unsupported(format!(
            "excel ingestion not enabled (enable cargo feature 'excel') for path ({})",
            path.display()
        )))
    }
}

/// Convenience helper for callers that want an owned request object.
///
/// Useful for handing re-ingestion of a stored upload to a worker thread or job queue.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Build a request for `path`, forcing the format declared by `extension`.
    pub fn new(path: impl Into<PathBuf>, extension: &str) -> IngestionResult<Self> {
        let format = IngestionFormat::from_extension(extension).ok_or_else(|| unsupported_extension(extension))?;
        Ok(Self {
            path: path.into(),
            options: IngestionOptions {
                format: Some(format),
                ..Default::default()
            },
        })
    }

    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> IngestionResult<RowSet> {
        ingest_from_path(&self.path, &self.options)
    }
}
