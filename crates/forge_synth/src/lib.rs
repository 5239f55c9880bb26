//! Credit-budgeted synthesis and repair of a single card game's executable
//! implementation: draft, run, patch, validate, repeat until the budget
//! exhausts or a validated checkpoint is reached.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod history;
pub mod region;
pub mod synth;

pub use checkpoint::{select_final_code, FinalSelection};
pub use config::SynthConfig;
pub use error::{Error, Result};
pub use history::ValidationRecord;
pub use region::Wrapped;
pub use synth::{synthesize, CandidateCompiler, SynthOutcome};
