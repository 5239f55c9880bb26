//! Derives strategies, metrics, and reflections from a rules description,
//! and flattens them into the policy texts that feed heuristic-function
//! synthesis.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod bundle;
pub mod designer;
pub mod error;

pub use bundle::{PolicyBundle, PolicyItem, PolicyMethod, Reflection};
pub use designer::design;
pub use error::{Error, Result};
