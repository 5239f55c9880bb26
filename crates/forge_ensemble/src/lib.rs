//! Combines a set of heuristic feature functions into one weighted agent,
//! with sign-flippable contributions and JSON persistence.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod agent;
pub mod error;
pub mod persist;

pub use agent::{ChoiceInfo, EnsembleAgent, SharedSeat, SyncSeat};
pub use error::{Error, Result};
pub use persist::{load, save, PersistedEnsemble, PersistedFeature};
