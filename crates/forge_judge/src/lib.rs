//! LLM-driven validation judge: compares a candidate's gameplay transcript
//! against its rules text and either passes it, flags the log as too thin to
//! judge, or proposes and applies a corrective patch.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod judge;
pub mod markers;

pub use error::{Error, Result};
pub use judge::{judge, JudgeConfig, JudgeOutcome};
pub use markers::{parse_verdict, truncate_transcript, Verdict};
