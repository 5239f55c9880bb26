//! Replay command implementation.

use anyhow::{Context, Result};
use forge_sim::{SimConfig, Simulation};
use tracing::{info, warn};

/// Runs the replay command: drives every seed scenario (and its
/// chaos-injected variants) through the real `forge_*` crates and reports
/// pass/fail counts, without touching the network.
pub fn run(seed: u64, scratch_dir: &str) -> Result<()> {
    info!("replaying simulation scenarios with seed {}", seed);

    let mut sim = Simulation::new(SimConfig::new(seed, scratch_dir));
    let results = sim.run_all().with_context(|| "simulation run failed")?;
    let summary = forge_sim::SimSummary::from_results(results);

    for result in &summary.results {
        if result.skipped {
            info!(scenario = %result.name, "skipped: {}", result.message);
        } else if result.passed {
            info!(scenario = %result.name, "passed: {}", result.message);
        } else {
            warn!(scenario = %result.name, "failed: {}", result.message);
        }
    }

    info!("{}", summary);

    if summary.failed > 0 {
        anyhow::bail!("{} of {} scenarios failed", summary.failed, summary.total);
    }

    Ok(())
}
