//! Error types for patch operations.

use thiserror::Error;

/// Errors that can occur while parsing or applying a patch.
///
/// The patch engine is deliberately permissive: malformed input yields an
/// empty instruction list rather than an error (see `parse_instructions`).
/// This type exists for the few operations that do have a failure mode.
#[derive(Debug, Error)]
pub enum Error {
    /// The patch was applied but left the source text unchanged even though
    /// at least one pair had a non-whitespace search string.
    #[error("patch produced no change to the source")]
    NoOp,
}

/// Result type alias for patch operations.
pub type Result<T> = std::result::Result<T, Error>;
