//! Error types for the simulation harness.

use thiserror::Error;

/// Errors raised while preparing or running a scenario.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Contract(#[from] forge_contract::Error),
    #[error(transparent)]
    Runner(#[from] forge_runner::Error),
    #[error(transparent)]
    Select(#[from] forge_select::Error),
    #[error(transparent)]
    Oracle(#[from] forge_oracle::Error),
}

/// Result type alias for the simulation harness.
pub type Result<T> = std::result::Result<T, Error>;
