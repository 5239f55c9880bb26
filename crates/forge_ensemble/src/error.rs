//! Error types for the ensemble agent.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no legal actions to choose among")]
    EmptyLegalActions,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
