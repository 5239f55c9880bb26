//! Heuristics command implementation.

use anyhow::{Context, Result};
use forge_ensemble::PersistedFeature;
use forge_heuristic::HeuristicFunction;
use forge_oracle::{OracleClient, OracleConfig};
use std::fs;
use tracing::info;

/// Runs the heuristics command: drafts one scoring function from a policy
/// description and persists it as a standalone [`PersistedFeature`].
pub async fn run(game_description: &str, policy_text: &str, io_description: &str, enable_fix: bool, output_path: &str) -> Result<()> {
    info!("drafting heuristic function for policy: {}", policy_text);

    let api_key = std::env::var("ANTHROPIC_API_KEY").with_context(|| "ANTHROPIC_API_KEY environment variable not set")?;
    let oracle = OracleClient::new(OracleConfig { api_key, ..OracleConfig::default() }).with_context(|| "failed to create oracle client")?;

    let function = HeuristicFunction::create(&oracle, game_description, policy_text, io_description, enable_fix)
        .await
        .with_context(|| "heuristic function drafting failed")?;

    info!(active = function.active, source = %function.source_text, "heuristic function drafted");

    let persisted = PersistedFeature {
        game_description: function.game_description,
        policy_text: function.policy_text,
        io_description: function.io_description,
        source_text: function.source_text,
        active: function.active,
        enable_fix: function.enable_fix,
    };
    let json = serde_json::to_string_pretty(&persisted).with_context(|| "failed to serialize heuristic function")?;
    fs::write(output_path, json).with_context(|| format!("failed to write output file: {output_path}"))?;
    info!("heuristic function written to: {}", output_path);

    Ok(())
}
