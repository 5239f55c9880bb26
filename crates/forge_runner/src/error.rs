//! Error types for the sandboxed runner.

use thiserror::Error;

/// Errors that can occur setting up or tearing down a trial. Failures
/// *inside* the candidate module are not represented here — they're
/// captured as text in the trial's error file, per the sandboxing contract.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to prepare the transcript or error file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for runner setup operations.
pub type Result<T> = std::result::Result<T, Error>;
