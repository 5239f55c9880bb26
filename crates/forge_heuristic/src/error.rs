//! Error types for the heuristic expression language.

use thiserror::Error;

/// Errors raised while parsing or evaluating a scoring-function expression.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The source ended while a token or sub-expression was still expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    /// A token didn't fit any grammar production.
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    /// An identifier wasn't a known variable, field, or function.
    #[error("unknown name: {0}")]
    UnknownName(String),
    /// A function was called with the wrong number of arguments.
    #[error("wrong argument count for {name}: expected {expected}, got {got}")]
    ArgCount {
        name: String,
        expected: usize,
        got: usize,
    },
    /// A value of the wrong shape was used where a number or list was
    /// expected.
    #[error("type error: {0}")]
    TypeError(String),
    /// Trailing input remained after a complete expression was parsed.
    #[error("trailing input after expression: {0}")]
    TrailingInput(String),
}

/// Result type alias for heuristic expression operations.
pub type Result<T> = std::result::Result<T, Error>;
