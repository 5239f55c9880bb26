//! Error types for feature selection.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no candidates to evaluate")]
    EmptyCandidates,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Runner(#[from] forge_runner::Error),
    #[error(transparent)]
    Contract(#[from] forge_contract::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
