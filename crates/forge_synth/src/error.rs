//! Error types for the synthesis loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Oracle(#[from] forge_oracle::Error),
    #[error(transparent)]
    Runner(#[from] forge_runner::Error),
    #[error("candidate failed to compile: {0}")]
    CompileFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
