//! Error types for retrieval operations.

use thiserror::Error;

/// Errors that can occur while building or querying an index.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read the example library or its cache.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failed to decode a cached embedding file.
    #[error("failed to decode embedding cache: {0}")]
    CacheDecode(String),

    /// The oracle call needed to build an embedding failed.
    #[error(transparent)]
    Oracle(#[from] forge_oracle::Error),
}

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, Error>;
