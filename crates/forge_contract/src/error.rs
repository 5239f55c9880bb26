//! Error types for game-module execution.

use thiserror::Error;

/// Errors a `GameModule` implementation can report.
#[derive(Debug, Error)]
pub enum Error {
    /// The module raised during `proceed_round`, `step`, or `run`.
    #[error("execution failed: {0}")]
    Execution(String),

    /// `get_legal_actions` returned no actions for a state that is not over.
    #[error("get_legal_actions returned no actions for a live state")]
    EmptyLegalActions,

    /// An action was not among the legal actions for the current state.
    #[error("illegal action: {0}")]
    IllegalAction(String),
}

/// Result type alias for game-module operations.
pub type Result<T> = std::result::Result<T, Error>;
