//! Error types for oracle operations.

use thiserror::Error;

/// Errors the oracle client can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// The API rejected the request with a non-success status.
    #[error("oracle API error: {0}")]
    Api(String),

    /// Rate limited; the provider told us how long to wait.
    #[error("rate limited, retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying, as reported by the provider.
        retry_after_seconds: u64,
    },

    /// No credential was configured.
    #[error("no oracle API key configured")]
    MissingApiKey,

    /// The response body could not be parsed into the expected shape.
    #[error("failed to parse oracle response: {0}")]
    Parse(String),

    /// Transport-level failure, after retries are exhausted.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// Filesystem failure writing the chat log.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for oracle operations.
pub type Result<T> = std::result::Result<T, Error>;
