//! Built-in game fixtures the CLI can drive its pipeline commands against.
//!
//! forge has no safe runtime-compilation primitive for freshly synthesized
//! Rust source (see `forge_synth::CandidateCompiler`'s doc comment), so
//! unlike the original system's `exec()`-based loop, this CLI cannot yet
//! turn an oracle-authored candidate into a runnable module. Until a real
//! sandboxed compiler backend exists, `--game high-card` is the only game
//! the pipeline commands can actually play; `FixtureCompiler` stands in for
//! a real compiler by always returning that fixture, ignoring the
//! candidate source it's handed.

use forge_contract::fixtures::HighCardGame;
use forge_contract::GameModule;
use forge_runner::ModuleFactory;
use forge_synth::CandidateCompiler;
use std::path::Path;
use std::sync::Arc;

pub struct HighCardFactory;

impl ModuleFactory for HighCardFactory {
    fn build(&self, seed: u64, _transcript_path: &Path, _enable_info: bool) -> Box<dyn GameModule> {
        Box::new(HighCardGame::new(seed))
    }
}

pub struct FixtureCompiler;

impl CandidateCompiler for FixtureCompiler {
    fn compile(&self, _source: &str) -> Result<Arc<dyn ModuleFactory>, String> {
        Ok(Arc::new(HighCardFactory))
    }
}

/// Resolves a `--game` name to a factory. Only `high-card` exists today.
///
/// # Errors
///
/// Returns an error for any unrecognized name.
pub fn resolve_factory(name: &str) -> anyhow::Result<Arc<dyn ModuleFactory>> {
    match name {
        "high-card" => Ok(Arc::new(HighCardFactory)),
        other => anyhow::bail!("unknown built-in game '{other}'; only 'high-card' is available until a real compiler backend is wired in"),
    }
}
