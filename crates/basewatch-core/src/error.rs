//! Error types for basewatch-core.

use thiserror::Error;

use basewatch_types::ValidationError;

/// Errors returned while processing a scan.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input was rejected before any state was touched.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The snapshot could not be persisted.
    #[error("Storage error: {0}")]
    Store(#[from] basewatch_store::Error),
}

/// Result type alias for basewatch-core operations.
pub type Result<T> = std::result::Result<T, Error>;
