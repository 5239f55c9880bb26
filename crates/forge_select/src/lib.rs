//! Forward-greedy, sign-flip-aware feature selection over a pool of
//! heuristic functions, scored by self-play tournament win rate and
//! evaluated through a bounded worker-thread pool.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod history;
pub mod select;
pub mod tournament;

pub use error::{Error, Result};
pub use history::{load as load_history, HistoryStep};
pub use select::{select, SelectionResult};
pub use tournament::{evaluate_candidate, CandidateSpec, TournamentConfig};
