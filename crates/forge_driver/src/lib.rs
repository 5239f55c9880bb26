//! Sequences Policy Design, Heuristic Function synthesis, Ensemble
//! bundling, fix-by-playing, and Feature Selection into one end-to-end AI
//! creation pipeline, one game at a time.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod driver;
pub mod error;

pub use config::DriverConfig;
pub use driver::{create_ai, DriverOutcome};
pub use error::{Error, Result};
