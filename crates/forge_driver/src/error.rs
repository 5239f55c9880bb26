//! Error types for the end-to-end AI creation pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Policy(#[from] forge_policy::Error),
    #[error(transparent)]
    Oracle(#[from] forge_oracle::Error),
    #[error(transparent)]
    Runner(#[from] forge_runner::Error),
    #[error(transparent)]
    Select(#[from] forge_select::Error),
    #[error(transparent)]
    Ensemble(#[from] forge_ensemble::Error),
    #[error("background task failed to join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
