//! Error types for the validation judge.

use thiserror::Error;

/// Errors the judge can surface. Transport failures are retried internally
/// up to the configured bound; this type only represents what's left after
/// that bound is exhausted, or setup failures.
#[derive(Debug, Error)]
pub enum Error {
    /// The oracle call failed on every attempt.
    #[error(transparent)]
    Oracle(#[from] forge_oracle::Error),
}

/// Result type alias for judge operations.
pub type Result<T> = std::result::Result<T, Error>;
