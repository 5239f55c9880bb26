//! Judge command implementation.

use anyhow::{Context, Result};
use forge_judge::{judge, JudgeConfig, JudgeOutcome};
use forge_oracle::{OracleClient, OracleConfig};
use std::fs;
use tracing::info;

/// Runs the judge command: compares a candidate's transcript against its
/// rules text and reports (or applies) the verdict.
pub async fn run(rules_path: &str, source_path: &str, transcript_path: &str, output_path: Option<&str>) -> Result<()> {
    info!("judging transcript: {}", transcript_path);

    let api_key = std::env::var("ANTHROPIC_API_KEY").with_context(|| "ANTHROPIC_API_KEY environment variable not set")?;
    let oracle = OracleClient::new(OracleConfig { api_key, ..OracleConfig::default() }).with_context(|| "failed to create oracle client")?;

    let rules_text = fs::read_to_string(rules_path).with_context(|| format!("failed to read rules file: {rules_path}"))?;
    let source = fs::read_to_string(source_path).with_context(|| format!("failed to read source file: {source_path}"))?;
    let transcript = fs::read_to_string(transcript_path).with_context(|| format!("failed to read transcript file: {transcript_path}"))?;

    match judge(&oracle, None, &rules_text, &source, &transcript, &JudgeConfig::default()).await {
        JudgeOutcome::Pass => info!("verdict: pass"),
        JudgeOutcome::DeadLog => info!("verdict: dead log (transcript too short to judge)"),
        JudgeOutcome::Patched { summary, quote, patched_source } => {
            info!(summary = %summary, quote = quote.as_deref().unwrap_or(""), "verdict: patched");
            if let Some(path) = output_path {
                fs::write(path, &patched_source).with_context(|| format!("failed to write output file: {path}"))?;
                info!("patched source written to: {}", path);
            }
        }
    }

    Ok(())
}
