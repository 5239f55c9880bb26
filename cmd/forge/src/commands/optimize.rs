//! Optimize command implementation.

use crate::fixtures;
use anyhow::{Context, Result};
use forge_ensemble::{EnsembleAgent, PersistedEnsemble};
use forge_oracle::{OracleClient, OracleConfig};
use forge_select::{select, CandidateSpec, TournamentConfig};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Runs the optimize command: loads a persisted ensemble's heuristic pool
/// and runs the forward-greedy feature selection tournament against it,
/// reporting (and persisting) the winning combination.
#[allow(clippy::too_many_arguments)]
pub fn run(
    game: &str,
    ensemble_path: &str,
    scratch_dir: &str,
    history_path: &str,
    base_seed: u64,
    output_path: &str,
) -> Result<()> {
    info!("optimizing feature selection for game: {}", game);

    let api_key = std::env::var("ANTHROPIC_API_KEY").with_context(|| "ANTHROPIC_API_KEY environment variable not set")?;
    let oracle = Arc::new(OracleClient::new(OracleConfig { api_key, ..OracleConfig::default() }).with_context(|| "failed to create oracle client")?);

    let contents = fs::read_to_string(ensemble_path).with_context(|| format!("failed to read ensemble file: {ensemble_path}"))?;
    let persisted: PersistedEnsemble = serde_json::from_str(&contents).with_context(|| "failed to parse ensemble file")?;
    let agent = EnsembleAgent::from_persisted(persisted);

    let factory = fixtures::resolve_factory(game)?;
    let scratch_dir = Path::new(scratch_dir);
    let history_path = Path::new(history_path);
    let opponent_pool: Vec<CandidateSpec> = Vec::new();

    let result = select(
        &factory,
        &oracle,
        &agent.feature_functions,
        &opponent_pool,
        &TournamentConfig::default(),
        scratch_dir,
        history_path,
        base_seed,
    )
    .with_context(|| "feature selection failed")?;

    info!(
        selected = ?result.selected_indices,
        flipped = ?result.flipped_indices,
        metric = result.best_metric,
        "selection complete"
    );

    let selected_flipped: std::collections::BTreeSet<usize> = result
        .selected_indices
        .iter()
        .enumerate()
        .filter_map(|(position, original_index)| result.flipped_indices.contains(original_index).then_some(position))
        .collect();
    let final_agent = EnsembleAgent::new(
        agent.game_description.clone(),
        agent.io_description.clone(),
        agent.policy_list.clone(),
        result.selected_indices.iter().filter_map(|&i| agent.feature_functions.get(i).cloned()).collect(),
    )
    .with_flipped(selected_flipped);

    let json = serde_json::to_string_pretty(&final_agent.to_persisted()).with_context(|| "failed to serialize ensemble")?;
    fs::write(output_path, json).with_context(|| format!("failed to write output file: {output_path}"))?;
    info!("optimized ensemble written to: {}", output_path);

    Ok(())
}
