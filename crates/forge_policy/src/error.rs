//! Error types for policy design.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Oracle(#[from] forge_oracle::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
