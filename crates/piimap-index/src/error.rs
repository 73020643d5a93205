//! Index pipeline error types.
//!
//! Structured errors carrying the paths and group names involved, so the
//! end-of-run report can name every failed unit.

use std::path::PathBuf;

use thiserror::Error;

use piimap_core::CoreError;
use piimap_schema::SchemaValidationError;

/// Errors raised by the index pipeline.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The dataset root does not exist. Fatal for the whole run.
    #[error("data directory not found: {path}")]
    DataRootMissing { path: PathBuf },

    /// A requested group directory does not exist.
    #[error("group directory not found: {path}")]
    GroupNotFound { path: PathBuf },

    /// A group yielded no valid record, so no index can be built for it.
    #[error("no valid records in group {group} ({} excluded)", excluded.len())]
    GroupEmpty {
        group: String,
        excluded: Vec<ExcludedRecord>,
    },

    /// An index file could not be read.
    #[error("failed to read index {path}: {source}")]
    IndexRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An index file is not a valid index document.
    #[error("failed to parse index {path}: {source}")]
    IndexParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A stored index has no `framework`, so it cannot contribute coverage.
    #[error("index {path} has no framework")]
    MissingFramework { path: PathBuf },

    /// An output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Generic serde_json error (not file-specific).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for index pipeline operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Why a record was left out of its group's index.
#[derive(Debug, Error)]
pub enum RecordIssue {
    /// Unreadable file or schema violation.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    /// The filename cannot yield a slug.
    #[error(transparent)]
    Filename(#[from] CoreError),

    /// Schema-valid but not convertible to the typed record model.
    #[error("record does not match the record model: {0}")]
    Model(#[from] serde_json::Error),
}

/// A record excluded from an index.
#[derive(Debug)]
pub struct ExcludedRecord {
    pub path: PathBuf,
    pub issue: RecordIssue,
}
