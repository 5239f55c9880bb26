//! Example retrieval: description-similarity ranking and code-snippet
//! retrieval, both backed by the oracle client's embedding endpoint.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod description;
pub mod error;
pub mod snippet;

pub use description::{DescriptionIndex, RankedExample};
pub use error::{Error, Result};
pub use snippet::{ScoredSnippet, SnippetIndex, SnippetNode};
