//! Sequences Policy Design, per-method Heuristic Function synthesis,
//! Ensemble bundling, fix-by-playing, and two rounds of Feature Selection
//! into one end-to-end AI creation pipeline.

use crate::config::DriverConfig;
use crate::error::Result;
use forge_contract::Agent;
use forge_ensemble::{EnsembleAgent, SharedSeat};
use forge_heuristic::HeuristicFunction;
use forge_oracle::OracleClient;
use forge_runner::ModuleFactory;
use forge_select::{CandidateSpec, SelectionResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Everything [`create_ai`] produces for one game.
#[derive(Debug, Clone)]
pub struct DriverOutcome {
    pub ensemble: forge_ensemble::PersistedEnsemble,
    pub selection: SelectionResult,
}

/// Runs the full pipeline for one game: designs a policy from `rules_text`,
/// synthesizes one heuristic function per policy text under every method in
/// `config.methods`, bundles them into an ensemble, hardens it by
/// self-play, then runs `config.selection_rounds` rounds of feature
/// selection against a pool of historical opponent configurations.
///
/// # Errors
///
/// Returns an error if policy design, heuristic synthesis, self-play, or
/// feature selection fails.
pub async fn create_ai(
    oracle: &Arc<OracleClient>,
    factory: &Arc<dyn ModuleFactory>,
    game_description: &str,
    io_description: &str,
    rules_text: &str,
    scratch_dir: &Path,
    config: &DriverConfig,
) -> Result<DriverOutcome> {
    std::fs::create_dir_all(scratch_dir).map_err(forge_runner::Error::from)?;

    info!("designing policy");
    let bundle = forge_policy::design(oracle, rules_text, config.num_strategies, config.num_metrics).await?;

    let mut heuristic_pool: Vec<HeuristicFunction> = Vec::new();
    let mut policy_list: Vec<String> = Vec::new();
    for method in &config.methods {
        for policy_text in bundle.get_policy(*method) {
            let function =
                HeuristicFunction::create(oracle, game_description, &policy_text, io_description, config.enable_fix)
                    .await?;
            heuristic_pool.push(function);
            policy_list.push(policy_text);
        }
    }
    info!(count = heuristic_pool.len(), "synthesized heuristic pool");

    let ensemble = EnsembleAgent::new(
        game_description.to_string(),
        io_description.to_string(),
        policy_list,
        heuristic_pool.clone(),
    );
    let ensemble = fix_by_playing(factory, oracle, ensemble, scratch_dir, config).await?;
    let heuristic_pool = ensemble.feature_functions.clone();

    let history_path = scratch_dir.join("selection_history.json");
    let mut opponent_pool: Vec<CandidateSpec> = Vec::new();
    let mut selection = SelectionResult {
        selected_indices: Vec::new(),
        flipped_indices: BTreeSet::new(),
        best_metric: 0.0,
    };

    for round in 0..config.selection_rounds {
        info!(round, "running feature selection round");
        selection = run_selection_round(
            factory,
            oracle,
            &heuristic_pool,
            &opponent_pool,
            &history_path,
            scratch_dir,
            config,
            round as u64,
        )
        .await?;
        opponent_pool.push(CandidateSpec {
            indices: selection.selected_indices.clone(),
            flipped: selection.flipped_indices.clone(),
        });
    }

    let selected_flipped: BTreeSet<usize> = selection
        .selected_indices
        .iter()
        .enumerate()
        .filter_map(|(position, original_index)| selection.flipped_indices.contains(original_index).then_some(position))
        .collect();
    let final_ensemble = EnsembleAgent::new(
        ensemble.game_description.clone(),
        ensemble.io_description.clone(),
        ensemble.policy_list.clone(),
        selection
            .selected_indices
            .iter()
            .filter_map(|&i| heuristic_pool.get(i).cloned())
            .collect(),
    )
    .with_flipped(selected_flipped);

    Ok(DriverOutcome {
        ensemble: final_ensemble.to_persisted(),
        selection,
    })
}

/// Plays `config.fix_by_playing_games` self-play games against
/// `num_players - 1` random opponents, stopping early on the first game
/// that completes without error. The ensemble is shared behind a mutex so
/// a heuristic's self-repair state, once mutated, carries into the next
/// game rather than being dropped with that game's module.
async fn fix_by_playing(
    factory: &Arc<dyn ModuleFactory>,
    oracle: &Arc<OracleClient>,
    ensemble: EnsembleAgent,
    scratch_dir: &Path,
    config: &DriverConfig,
) -> Result<EnsembleAgent> {
    let shared = Arc::new(Mutex::new(ensemble));
    let factory = Arc::clone(factory);
    let oracle = Arc::clone(oracle);
    let scratch_dir: PathBuf = scratch_dir.to_path_buf();
    let num_players = config.num_players;
    let games = config.fix_by_playing_games;
    let shared_for_task = Arc::clone(&shared);

    tokio::task::spawn_blocking(move || {
        for i in 0..games {
            let transcript_path = scratch_dir.join(format!("fix_by_play_{i}.log"));
            let seed = 0xF1CB_0000_u64.wrapping_add(i as u64);
            let mut module = factory.build(seed, &transcript_path, false);

            let mut agents: Vec<Box<dyn Agent>> = (0..num_players.saturating_sub(1))
                .map(|seat| Box::new(forge_contract::RandomAgent::new(seed.wrapping_add(100 + seat as u64))) as Box<dyn Agent>)
                .collect();
            agents.push(Box::new(SharedSeat::new(Arc::clone(&shared_for_task), Arc::clone(&oracle), seed, 0.2)));
            module.set_agents(agents);

            if module.run().is_ok() {
                break;
            }
        }
    })
    .await?;

    let ensemble = Arc::try_unwrap(shared)
        .unwrap_or_else(|arc| Mutex::new(arc.lock().expect("ensemble mutex poisoned").clone()))
        .into_inner()
        .expect("ensemble mutex poisoned");
    Ok(ensemble)
}

#[allow(clippy::too_many_arguments)]
async fn run_selection_round(
    factory: &Arc<dyn ModuleFactory>,
    oracle: &Arc<OracleClient>,
    heuristic_pool: &[HeuristicFunction],
    opponent_pool: &[CandidateSpec],
    history_path: &Path,
    scratch_dir: &Path,
    config: &DriverConfig,
    round: u64,
) -> Result<SelectionResult> {
    let factory = Arc::clone(factory);
    let oracle = Arc::clone(oracle);
    let heuristic_pool = heuristic_pool.to_vec();
    let opponent_pool = opponent_pool.to_vec();
    let history_path = history_path.to_path_buf();
    let scratch_dir = scratch_dir.to_path_buf();
    let tournament_config = config.tournament.clone();
    let base_seed = 0xBEEF_0000_u64.wrapping_add(round.wrapping_mul(10_000));

    let result = tokio::task::spawn_blocking(move || {
        forge_select::select(
            &factory,
            &oracle,
            &heuristic_pool,
            &opponent_pool,
            &tournament_config,
            &scratch_dir,
            &history_path,
            base_seed,
        )
    })
    .await??;
    Ok(result)
}
