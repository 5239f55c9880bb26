//! Self-play tournament evaluator: scores one candidate feature selection by
//! seating it against training-assistant opponents over repeated games.

use crate::error::{Error, Result};
use forge_contract::{Agent, GameModule, RandomAgent};
use forge_ensemble::{EnsembleAgent, SyncSeat};
use forge_heuristic::HeuristicFunction;
use forge_oracle::OracleClient;
use forge_runner::ModuleFactory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// One selection of heuristic indices and which of them are sign-flipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpec {
    pub indices: Vec<usize>,
    pub flipped: BTreeSet<usize>,
}

/// Fixed knobs for one tournament evaluation.
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    pub num_players: usize,
    pub num_test_runs: usize,
    pub maximize: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            num_players: 2,
            num_test_runs: 20,
            maximize: true,
        }
    }
}

/// Builds an [`EnsembleAgent`] for the given candidate by selecting from
/// `pool` by index, with uniform weights and the candidate's sign flips.
fn build_agent(pool: &[HeuristicFunction], spec: &CandidateSpec) -> EnsembleAgent {
    let features: Vec<HeuristicFunction> = spec
        .indices
        .iter()
        .filter_map(|&i| pool.get(i).cloned())
        .collect();
    EnsembleAgent::new(String::new(), String::new(), Vec::new(), features).with_flipped(reindex_flipped(spec))
}

/// Sign flips are indices into the candidate's own selected-heuristic list,
/// which already equals its position here since heuristics are appended in
/// `indices` order.
fn reindex_flipped(spec: &CandidateSpec) -> BTreeSet<usize> {
    spec.indices
        .iter()
        .enumerate()
        .filter_map(|(position, original_index)| spec.flipped.contains(original_index).then_some(position))
        .collect()
}

/// Exploitation-only seating: tournament evaluation scores the candidate's
/// best play, not its exploratory play.
const TOURNAMENT_TEMPERATURE: f64 = 0.0;

/// Plays `config.num_test_runs` independent games with the candidate seated
/// last and `config.num_players - 1` training-assistant opponents (drawn
/// uniformly from `opponent_pool`, or random play if it's empty), and
/// returns the candidate's win rate.
///
/// # Errors
///
/// Returns an error if a game fails to run.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_candidate(
    factory: &Arc<dyn ModuleFactory>,
    oracle: &Arc<OracleClient>,
    heuristic_pool: &[HeuristicFunction],
    candidate: &CandidateSpec,
    opponent_pool: &[CandidateSpec],
    config: &TournamentConfig,
    scratch_dir: &Path,
    base_seed: u64,
) -> Result<f64> {
    let mut rng = StdRng::seed_from_u64(base_seed);
    let mut wins = 0usize;

    for run in 0..config.num_test_runs {
        let seed = base_seed.wrapping_add(run as u64);
        let transcript_path = scratch_dir.join(format!("tournament_{seed}.log"));
        let mut module = factory.build(seed, &transcript_path, false);

        let mut agents: Vec<Box<dyn Agent>> = Vec::with_capacity(config.num_players);
        for seat in 0..config.num_players.saturating_sub(1) {
            let opponent_seed = seed.wrapping_add(1000 + seat as u64);
            if opponent_pool.is_empty() {
                agents.push(Box::new(RandomAgent::new(opponent_seed)));
                continue;
            }
            let opponent_spec = &opponent_pool[rng.gen_range(0..opponent_pool.len())];
            let opponent_agent = build_agent(heuristic_pool, opponent_spec);
            agents.push(Box::new(SyncSeat::new(opponent_agent, Arc::clone(oracle), opponent_seed, TOURNAMENT_TEMPERATURE)));
        }
        let learner_agent = build_agent(heuristic_pool, candidate);
        agents.push(Box::new(SyncSeat::new(learner_agent, Arc::clone(oracle), seed, TOURNAMENT_TEMPERATURE)));

        module.set_agents(agents);
        let payoffs = module.run()?;
        let learner_payoff = *payoffs.last().ok_or(Error::EmptyCandidates)?;

        let extreme = if config.maximize {
            payoffs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        } else {
            payoffs.iter().copied().fold(f64::INFINITY, f64::min)
        };
        if (learner_payoff - extreme).abs() < f64::EPSILON {
            wins += 1;
        }
    }

    Ok(wins as f64 / config.num_test_runs as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reindex_flipped_maps_original_indices_to_positions() {
        let spec = CandidateSpec {
            indices: vec![3, 1, 4],
            flipped: BTreeSet::from([1, 4]),
        };
        assert_eq!(reindex_flipped(&spec), BTreeSet::from([1, 2]));
    }

    #[test]
    fn build_agent_selects_by_index() {
        let pool = vec![
            HeuristicFunction::restore("g".into(), "p0".into(), "io".into(), "1".into(), true, true),
            HeuristicFunction::restore("g".into(), "p1".into(), "io".into(), "2".into(), true, true),
        ];
        let spec = CandidateSpec { indices: vec![1], flipped: BTreeSet::new() };
        let agent = build_agent(&pool, &spec);
        assert_eq!(agent.feature_functions.len(), 1);
        assert_eq!(agent.feature_functions[0].policy_text, "p1");
    }
}
