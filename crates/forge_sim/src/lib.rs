//! Deterministic simulation and chaos-injection harness exercising the
//! synthesis and optimization pipeline end to end.
//!
//! This crate is not a dependency of the synthesis loop itself; it is an
//! integration-test harness that other crates' test suites (and the `forge`
//! CLI's `replay` subcommand) can call into to run the seed scenarios and
//! their chaos-injected variants against real `forge_*` crates, without a
//! network connection.
//!
//! # Example
//!
//! ```rust,no_run
//! use forge_sim::{SimConfig, Simulation};
//!
//! let mut sim = Simulation::new(SimConfig::new(1, "/tmp/forge-sim-scratch"));
//! let summary = forge_sim::SimSummary::from_results(sim.run_all().unwrap());
//! println!("{summary}");
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod campaigns;
pub mod chaos;
pub mod error;
pub mod harness;
pub mod scenario;

pub use campaigns::{
    run_all_campaigns, run_patch_robustness_campaign, run_runner_resilience_campaign, run_selection_convergence_campaign, CampaignResult,
};
pub use chaos::{ChaosConfig, ChaosInjector, PatchCorruption};
pub use error::{Error, Result};
pub use harness::{SimConfig, Simulation};
pub use scenario::{Scenario, SimResult, SimSummary};
