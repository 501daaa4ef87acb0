//! Error types for basewatch-store.

use std::path::PathBuf;

/// Result type for basewatch-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or persisting locations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create the storage directory.
    #[error("Failed to create storage directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The store file was written by a newer format version.
    #[error("Unsupported store format version {found} (this build supports up to {supported})")]
    UnsupportedVersion { found: u64, supported: u64 },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
