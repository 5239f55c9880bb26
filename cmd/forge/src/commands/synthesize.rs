//! Synthesize command implementation.

use crate::fixtures::FixtureCompiler;
use anyhow::{Context, Result};
use forge_oracle::{OracleClient, OracleConfig};
use forge_synth::SynthConfig;
use std::fs;
use std::path::Path;
use tracing::info;

/// Runs the synthesize command: the credit-budgeted draft/run/patch/validate
/// loop for one game, against the `FixtureCompiler` (see `fixtures.rs` for
/// why this is the only compiler backend available today).
pub async fn run(game: &str, rules_path: &str, scratch_dir: &str, output_path: &str) -> Result<()> {
    info!("synthesizing code for game: {}", game);

    let api_key = std::env::var("ANTHROPIC_API_KEY").with_context(|| "ANTHROPIC_API_KEY environment variable not set")?;
    let oracle = OracleClient::new(OracleConfig { api_key, ..OracleConfig::default() }).with_context(|| "failed to create oracle client")?;

    let rules_text = fs::read_to_string(rules_path).with_context(|| format!("failed to read rules file: {rules_path}"))?;
    let scratch_dir = Path::new(scratch_dir);

    let outcome = forge_synth::synthesize(
        &oracle,
        &FixtureCompiler,
        None,
        game,
        scratch_dir,
        &rules_text,
        String::new(),
        &SynthConfig::default(),
    )
    .await
    .with_context(|| "synthesis loop failed")?;

    info!(
        edits = outcome.edit_count,
        credits_remaining = outcome.credits_remaining,
        quality_score = outcome.selection.quality_score,
        "synthesis finished"
    );

    fs::write(output_path, &outcome.selection.source).with_context(|| format!("failed to write output file: {output_path}"))?;
    info!("final candidate written to: {}", output_path);

    Ok(())
}
