use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// One enum is shared by the CSV and (optional) Excel branches and by the upload store.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook could not be opened or read (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV tokenizer failure (unequal field counts, broken quoting, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The file extension (or requested format) is not one the pipeline can read.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },
}

/// Coarse classification callers use to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Extension not recognized; reject before storing or parsing.
    UnsupportedFormat,
    /// File missing or unreadable.
    Io,
    /// Structural failure while decoding or tokenizing.
    Parse,
}

impl IngestionError {
    /// Classify this error.
    ///
    /// CSV and workbook errors are `Parse` unless their cause is an I/O error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestionError::Io(_) => ErrorKind::Io,
            IngestionError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            IngestionError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ErrorKind::Io,
                _ => ErrorKind::Parse,
            },
            #[cfg(feature = "excel")]
            IngestionError::Excel(err) => {
                if error_chain_contains_io(err) {
                    ErrorKind::Io
                } else {
                    ErrorKind::Parse
                }
            }
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        IngestionError::UnsupportedFormat {
            message: message.into(),
        }
    }
}

#[cfg(feature = "excel")]
fn error_chain_contains_io(e: &calamine::Error) -> bool {
    use std::error::Error as StdError;

    if matches!(e, calamine::Error::Io(_)) {
        return true;
    }
    let mut cur: Option<&(dyn StdError + 'static)> = e.source();
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}
