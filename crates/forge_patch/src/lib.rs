//! Deterministic SEARCH/REPLACE patch engine.
//!
//! Parses fenced code blocks and literal `<<<<<<< SEARCH` / `=======` /
//! `>>>>>>> REPLACE` triples out of LLM-generated text, and applies them to
//! a source string as first-occurrence literal replacements.
//!
//! # Example
//!
//! ```
//! use forge_patch::apply_edits;
//!
//! let raw = "```rust\n<<<<<<< SEARCH\nold\n=======\nnew\n>>>>>>> REPLACE\n```";
//! assert_eq!(apply_edits(raw, "old code", "rust"), "new code");
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod engine;
pub mod error;

pub use engine::{
    apply_edits, apply_patch, apply_patch_checked, extract_snippets, neutralize_prints,
    parse_instructions,
};
pub use error::{Error, Result};
