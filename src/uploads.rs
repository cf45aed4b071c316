//! On-disk store for uploaded files.
//!
//! Raw uploads are kept as files and re-parsed on every reload; parsed rows are never cached, so
//! a reload always reflects what is on disk. The metadata a caller needs to persist is the
//! [`UploadRecord`].

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::IngestionResult;
use crate::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
use crate::processing::{preview, RowSetPreview, DEFAULT_PREVIEW_ROWS};
use crate::types::RowSet;

/// Configuration for an [`UploadStore`].
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// How many rows [`UploadStore::preview`] forwards.
    pub preview_rows: usize,
    /// Options passed to every ingestion. `format` is overridden per upload from the original
    /// file name.
    pub ingestion: IngestionOptions,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            ingestion: IngestionOptions::default(),
        }
    }
}

/// Metadata of one stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    /// File name as supplied by the client.
    pub original_filename: String,
    /// Row count of the successful ingestion at upload time.
    pub row_count: usize,
    pub column_count: usize,
    /// Where the raw bytes were written.
    pub stored_path: PathBuf,
}

/// Result of [`UploadStore::store`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    pub record: UploadRecord,
    pub rows: RowSet,
}

/// Directory-backed store for raw upload files.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    options: UploadOptions,
}

impl UploadStore {
    /// Open (and create if needed) the upload directory.
    pub fn open(dir: impl Into<PathBuf>, options: UploadOptions) -> IngestionResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, options })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Store `bytes` under a unique name and ingest them.
    ///
    /// - Unsupported extensions are rejected before anything is written.
    /// - Directory components of `original_filename` are discarded.
    /// - If ingestion fails, the stored file is deleted again and the error is returned.
    pub fn store(&self, original_filename: &str, bytes: &[u8]) -> IngestionResult<StoredUpload> {
        let file_name = base_name(original_filename);
        let format = format_of(file_name)?;

        let stored_path = self.dir.join(format!("{}-{file_name}", unix_nanos()));
        write_new_file(&stored_path, bytes)?;

        let rows = match ingest_from_path(&stored_path, &self.ingestion_options(format)) {
            Ok(rows) => rows,
            Err(err) => {
                discard_partial_upload(&stored_path, "ingestion error");
                return Err(err);
            }
        };

        tracing::info!(
            original = original_filename,
            path = %stored_path.display(),
            rows = rows.row_count(),
            "stored upload"
        );

        Ok(StoredUpload {
            record: UploadRecord {
                original_filename: original_filename.to_owned(),
                row_count: rows.row_count(),
                column_count: rows.column_count(),
                stored_path,
            },
            rows,
        })
    }

    /// Re-ingest a stored upload from disk.
    ///
    /// A stored file that was deleted out-of-band surfaces as an I/O error.
    pub fn reload(&self, record: &UploadRecord) -> IngestionResult<RowSet> {
        let format = format_of(base_name(&record.original_filename))?;
        tracing::debug!(path = %record.stored_path.display(), "reloading upload");
        ingest_from_path(&record.stored_path, &self.ingestion_options(format))
    }

    /// Delete the stored file of `record`. A file that is already gone is not an error.
    pub fn remove(&self, record: &UploadRecord) -> IngestionResult<()> {
        match fs::remove_file(&record.stored_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Bounded prefix of `rows`, capped at [`UploadOptions::preview_rows`].
    pub fn preview<'a>(&self, rows: &'a RowSet) -> RowSetPreview<'a> {
        preview(rows, self.options.preview_rows)
    }

    fn ingestion_options(&self, format: IngestionFormat) -> IngestionOptions {
        IngestionOptions {
            format: Some(format),
            ..self.options.ingestion.clone()
        }
    }
}

fn base_name(original: &str) -> &str {
    original.rsplit(['/', '\\']).next().unwrap_or(original)
}

fn format_of(file_name: &str) -> IngestionResult<IngestionFormat> {
    IngestionFormat::from_path(Path::new(file_name))
}

fn write_new_file(path: &Path, bytes: &[u8]) -> IngestionResult<()> {
    let f = OpenOptions::new().write(true).create_new(true).open(path)?;
    write_or_discard(path, f, bytes)
}

/// Write `bytes` to the already-created file at `path`; on failure the file is removed so no
/// truncated upload is left behind.
fn write_or_discard<W: Write>(path: &Path, mut out: W, bytes: &[u8]) -> IngestionResult<()> {
    let written = out.write_all(bytes).and_then(|()| out.flush());
    drop(out);
    if let Err(err) = written {
        discard_partial_upload(path, "write error");
        return Err(err.into());
    }
    Ok(())
}

fn discard_partial_upload(path: &Path, after: &str) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "failed to remove upload after {}",
            after
        ),
    }
}

fn unix_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}
