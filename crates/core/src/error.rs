//! Error types for snapshot, diff and persistence operations

use std::path::PathBuf;

/// Errors produced by the core library
///
/// Every variant carries enough context (path, underlying cause) for a caller
/// to report it without further lookups. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file could not be stated, opened or hashed during a scan
    #[error("failed to process {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory walk itself failed (unreadable directory, bad root, ...)
    #[error("walk error at {}: {message}", path.display())]
    Traversal { path: PathBuf, message: String },

    /// A comparison was requested but no index has been saved yet
    #[error("index not found at {}", path.display())]
    SnapshotNotFound { path: PathBuf },

    /// A path lookup against a snapshot found nothing
    #[error("file not found in snapshot: {path}")]
    NotFound { path: String },

    /// Persisted index data is malformed
    #[error("malformed index data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing the index file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fingerprint string was not a 64-character hex digest
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    /// Two records in one snapshot claimed the same path
    #[error("duplicate path in snapshot: {0}")]
    DuplicatePath(String),
}

impl Error {
    pub(crate) fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error means "run an index first"
    pub fn is_snapshot_not_found(&self) -> bool {
        matches!(self, Self::SnapshotNotFound { .. })
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
