//! Create command implementation.

use crate::fixtures;
use anyhow::{Context, Result};
use forge_driver::DriverConfig;
use forge_oracle::{OracleClient, OracleConfig};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Runs the create command: the full design -> synthesize -> bundle ->
/// fix-by-playing -> select pipeline for one game.
pub async fn run(
    game: &str,
    rules_path: &str,
    game_description: &str,
    io_description: &str,
    scratch_dir: &str,
    output_path: &str,
) -> Result<()> {
    info!("creating an agent for game: {}", game);

    let api_key = std::env::var("ANTHROPIC_API_KEY").with_context(|| "ANTHROPIC_API_KEY environment variable not set")?;
    let oracle = Arc::new(OracleClient::new(OracleConfig { api_key, ..OracleConfig::default() }).with_context(|| "failed to create oracle client")?);

    let rules_text = fs::read_to_string(rules_path).with_context(|| format!("failed to read rules file: {rules_path}"))?;
    let factory = fixtures::resolve_factory(game)?;

    let scratch_dir = Path::new(scratch_dir);
    let outcome = forge_driver::create_ai(
        &oracle,
        &factory,
        game_description,
        io_description,
        &rules_text,
        scratch_dir,
        &DriverConfig::default(),
    )
    .await
    .with_context(|| "agent creation pipeline failed")?;

    info!(
        selected = ?outcome.selection.selected_indices,
        flipped = ?outcome.selection.flipped_indices,
        metric = outcome.selection.best_metric,
        "selection complete"
    );

    let json = serde_json::to_string_pretty(&outcome.ensemble).with_context(|| "failed to serialize ensemble")?;
    fs::write(output_path, json).with_context(|| format!("failed to write output file: {output_path}"))?;
    info!("ensemble written to: {}", output_path);

    Ok(())
}
