//! Aggregated multi-iteration campaigns, mirroring the reference crate's
//! `CampaignResult` shape but scoped to this workspace's own scenario set.

use crate::error::Result;
use crate::harness::{SimConfig, Simulation};
use crate::scenario::Scenario;
use std::time::Instant;

/// Outcome of running one named campaign to completion.
#[derive(Debug, Clone)]
pub struct CampaignResult {
    pub name: String,
    pub iterations: usize,
    pub real_elapsed_ms: u128,
    pub failures: usize,
    pub failure_details: Vec<String>,
    pub all_passed: bool,
}

impl CampaignResult {
    #[must_use]
    pub fn pass(name: impl Into<String>, iterations: usize, real_elapsed_ms: u128) -> Self {
        Self { name: name.into(), iterations, real_elapsed_ms, failures: 0, failure_details: Vec::new(), all_passed: true }
    }

    #[must_use]
    pub fn fail(name: impl Into<String>, iterations: usize, real_elapsed_ms: u128, failure_details: Vec<String>) -> Self {
        let failures = failure_details.len();
        Self { name: name.into(), iterations, real_elapsed_ms, failures, failure_details, all_passed: false }
    }
}

/// Runs the dropped-patch-block chaos scenario `iterations` times with
/// distinct seeds, confirming it degrades to a no-op (or is correctly
/// skipped when the chaos roll doesn't corrupt anything) on every seed.
///
/// # Errors
///
/// Returns an error only if a scenario's scratch files can't be prepared.
pub fn run_patch_robustness_campaign(base_seed: u64, iterations: usize, scratch_dir: &std::path::Path) -> Result<CampaignResult> {
    let started = Instant::now();
    let mut failures = Vec::new();
    for i in 0..iterations {
        let mut sim = Simulation::new(SimConfig::new(base_seed.wrapping_add(i as u64), scratch_dir));
        let result = sim.run_scenario(Scenario::PatchDroppedBlockIsNoOp)?;
        if !result.passed && !result.skipped {
            failures.push(format!("iteration {i}: {}", result.message));
        }
    }
    let elapsed = started.elapsed().as_millis();
    Ok(if failures.is_empty() {
        CampaignResult::pass("patch_robustness", iterations, elapsed)
    } else {
        CampaignResult::fail("patch_robustness", iterations, elapsed, failures)
    })
}

/// Runs the runner-timeout and truncated-transcript scenarios repeatedly,
/// confirming the sandboxed runner never hangs past its timeout and always
/// reports a bounded message regardless of how much commentary the
/// candidate module wrote before spinning.
///
/// # Errors
///
/// Returns an error only if a scenario's scratch files can't be prepared.
pub fn run_runner_resilience_campaign(base_seed: u64, iterations: usize, scratch_dir: &std::path::Path) -> Result<CampaignResult> {
    let started = Instant::now();
    let mut failures = Vec::new();
    for i in 0..iterations {
        let mut sim = Simulation::new(SimConfig::new(base_seed.wrapping_add(i as u64), scratch_dir));
        for scenario in [Scenario::RunnerTimeoutReportsInfiniteLoop, Scenario::RunnerTruncatedTranscriptTailIsBounded] {
            let result = sim.run_scenario(scenario)?;
            if !result.passed {
                failures.push(format!("iteration {i} {}: {}", scenario.name(), result.message));
            }
        }
    }
    let elapsed = started.elapsed().as_millis();
    Ok(if failures.is_empty() {
        CampaignResult::pass("runner_resilience", iterations, elapsed)
    } else {
        CampaignResult::fail("runner_resilience", iterations, elapsed, failures)
    })
}

/// Runs the feature-selection scenario repeatedly under distinct seeds,
/// confirming the forward-greedy search always halts with a monotonically
/// improving history, never looping or regressing.
///
/// # Errors
///
/// Returns an error only if a scenario's scratch files can't be prepared.
pub fn run_selection_convergence_campaign(base_seed: u64, iterations: usize, scratch_dir: &std::path::Path) -> Result<CampaignResult> {
    let started = Instant::now();
    let mut failures = Vec::new();
    for i in 0..iterations {
        let mut sim = Simulation::new(SimConfig::new(base_seed.wrapping_add(i as u64).wrapping_mul(97), scratch_dir));
        let result = sim.run_scenario(Scenario::FeatureSelectionImprovesThenHalts)?;
        if !result.passed {
            failures.push(format!("iteration {i}: {}", result.message));
        }
    }
    let elapsed = started.elapsed().as_millis();
    Ok(if failures.is_empty() {
        CampaignResult::pass("selection_convergence", iterations, elapsed)
    } else {
        CampaignResult::fail("selection_convergence", iterations, elapsed, failures)
    })
}

/// Runs every campaign in sequence, returning one result per campaign.
///
/// # Errors
///
/// Returns an error only if a scenario's scratch files can't be prepared.
pub fn run_all_campaigns(base_seed: u64, iterations: usize, scratch_dir: &std::path::Path) -> Result<Vec<CampaignResult>> {
    Ok(vec![
        run_patch_robustness_campaign(base_seed, iterations, scratch_dir)?,
        run_runner_resilience_campaign(base_seed.wrapping_add(1), iterations, scratch_dir)?,
        run_selection_convergence_campaign(base_seed.wrapping_add(2), iterations, scratch_dir)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("forge-sim-campaign-{name}-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        dir
    }

    #[test]
    fn patch_robustness_campaign_passes_across_seeds() {
        let dir = scratch_dir("patch");
        let result = run_patch_robustness_campaign(1, 5, &dir).unwrap();
        assert!(result.all_passed, "{:?}", result.failure_details);
        assert_eq!(result.iterations, 5);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn runner_resilience_campaign_passes_across_seeds() {
        let dir = scratch_dir("runner");
        let result = run_runner_resilience_campaign(1, 2, &dir).unwrap();
        assert!(result.all_passed, "{:?}", result.failure_details);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn selection_convergence_campaign_passes_across_seeds() {
        let dir = scratch_dir("selection");
        let result = run_selection_convergence_campaign(1, 2, &dir).unwrap();
        assert!(result.all_passed, "{:?}", result.failure_details);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
