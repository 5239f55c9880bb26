//! Forward-greedy sign-flip search over heuristic indices, scored by
//! self-play tournament win rate.

use crate::error::{Error, Result};
use crate::history::{self, HistoryStep};
use crate::tournament::{self, CandidateSpec, TournamentConfig};
use forge_heuristic::HeuristicFunction;
use forge_oracle::OracleClient;
use forge_runner::ModuleFactory;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use tracing::info;

/// Upper bound on how many worker threads evaluate candidates concurrently
/// in one round, beyond which extra candidates queue for a free worker.
const MAX_WORKERS: usize = 10;

#[derive(Debug, Clone)]
pub struct SelectionResult {
    pub selected_indices: Vec<usize>,
    pub flipped_indices: BTreeSet<usize>,
    pub best_metric: f64,
}

/// Runs the forward-greedy search to completion: at each round, tries
/// adding each not-yet-selected heuristic both unflipped and flipped,
/// evaluates every candidate via a bounded worker pool, and keeps the best
/// if it improves on the running best; stops on the first round with no
/// improvement.
///
/// # Errors
///
/// Returns an error if the heuristic pool is empty or a tournament game
/// fails to run.
pub fn select(
    factory: &Arc<dyn ModuleFactory>,
    oracle: &Arc<OracleClient>,
    heuristic_pool: &[HeuristicFunction],
    opponent_pool: &[CandidateSpec],
    tournament_config: &TournamentConfig,
    scratch_dir: &Path,
    history_path: &Path,
    base_seed: u64,
) -> Result<SelectionResult> {
    if heuristic_pool.is_empty() {
        return Err(Error::EmptyCandidates);
    }

    let mut best_indices: Vec<usize> = Vec::new();
    let mut best_flipped: BTreeSet<usize> = BTreeSet::new();
    let mut best_metric = f64::NEG_INFINITY;
    let mut round = 0u64;

    loop {
        let candidates = generate_candidates(&best_indices, &best_flipped, heuristic_pool.len());
        if candidates.is_empty() {
            break;
        }

        let metrics = evaluate_round(
            factory,
            oracle,
            heuristic_pool,
            opponent_pool,
            tournament_config,
            scratch_dir,
            base_seed.wrapping_add(round.wrapping_mul(10_000)),
            &candidates,
        )?;

        let Some((winner_index, winner_metric)) = argmax(&metrics) else {
            break;
        };
        if winner_metric <= best_metric {
            break;
        }

        best_metric = winner_metric;
        best_indices = candidates[winner_index].indices.clone();
        best_flipped = candidates[winner_index].flipped.clone();
        info!(round, best_metric, ?best_indices, "feature selection improved");

        history::append(
            history_path,
            HistoryStep {
                indices: best_indices.clone(),
                flipped: best_flipped.clone(),
                metric: best_metric,
            },
        )?;
        round += 1;
    }

    Ok(SelectionResult {
        selected_indices: best_indices,
        flipped_indices: best_flipped,
        best_metric: if best_metric.is_finite() { best_metric } else { 0.0 },
    })
}

/// For every heuristic not already in `best_indices`, proposes adding it
/// both unflipped and flipped.
fn generate_candidates(best_indices: &[usize], best_flipped: &BTreeSet<usize>, pool_size: usize) -> Vec<CandidateSpec> {
    let selected: BTreeSet<usize> = best_indices.iter().copied().collect();
    let mut candidates = Vec::new();
    for i in 0..pool_size {
        if selected.contains(&i) {
            continue;
        }
        let mut indices = best_indices.to_vec();
        indices.push(i);

        candidates.push(CandidateSpec {
            indices: indices.clone(),
            flipped: best_flipped.clone(),
        });

        let mut flipped = best_flipped.clone();
        flipped.insert(i);
        candidates.push(CandidateSpec { indices, flipped });
    }
    candidates
}

/// Returns the index and value of the largest metric, breaking ties toward
/// the earliest index rather than the last.
fn argmax(metrics: &[f64]) -> Option<(usize, f64)> {
    let mut iter = metrics.iter().copied().enumerate();
    let mut best = iter.next()?;
    for candidate in iter {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }
    Some(best)
}

/// Evaluates every candidate via a pool of at most
/// `min(MAX_WORKERS, candidates.len())` OS threads, isolating panics per
/// candidate so one buggy heuristic cannot take down the whole round.
#[allow(clippy::too_many_arguments)]
fn evaluate_round(
    factory: &Arc<dyn ModuleFactory>,
    oracle: &Arc<OracleClient>,
    heuristic_pool: &[HeuristicFunction],
    opponent_pool: &[CandidateSpec],
    tournament_config: &TournamentConfig,
    scratch_dir: &Path,
    base_seed: u64,
    candidates: &[CandidateSpec],
) -> Result<Vec<f64>> {
    let worker_count = MAX_WORKERS.min(candidates.len()).max(1);
    let (job_tx, job_rx) = mpsc::channel::<(usize, CandidateSpec)>();
    let (result_tx, result_rx) = mpsc::channel::<(usize, f64)>();
    let job_rx = Arc::new(std::sync::Mutex::new(job_rx));

    for (index, candidate) in candidates.iter().cloned().enumerate() {
        job_tx.send((index, candidate)).expect("job channel receiver dropped before send");
    }
    drop(job_tx);

    let heuristic_pool: Vec<HeuristicFunction> = heuristic_pool.to_vec();
    let opponent_pool: Vec<CandidateSpec> = opponent_pool.to_vec();
    let scratch_dir: PathBuf = scratch_dir.to_path_buf();

    let metrics = std::thread::scope(|scope| {
        for _ in 0..worker_count {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            let factory = Arc::clone(factory);
            let oracle = Arc::clone(oracle);
            let heuristic_pool = &heuristic_pool;
            let opponent_pool = &opponent_pool;
            let tournament_config = tournament_config.clone();
            let scratch_dir = &scratch_dir;

            scope.spawn(move || loop {
                let next = job_rx.lock().expect("job queue mutex poisoned").recv();
                let Ok((index, candidate)) = next else { break };
                let seed = base_seed.wrapping_add(index as u64);
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    tournament::evaluate_candidate(
                        &factory,
                        &oracle,
                        heuristic_pool,
                        &candidate,
                        opponent_pool,
                        &tournament_config,
                        scratch_dir,
                        seed,
                    )
                }));
                let metric = match outcome {
                    Ok(Ok(metric)) => metric,
                    Ok(Err(_)) | Err(_) => f64::NEG_INFINITY,
                };
                result_tx.send((index, metric)).expect("result channel receiver dropped before send");
            });
        }
        drop(result_tx);

        let mut metrics = vec![f64::NEG_INFINITY; candidates.len()];
        for (index, metric) in result_rx {
            metrics[index] = metric;
        }
        metrics
    });

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_candidates_proposes_flipped_and_unflipped() {
        let candidates = generate_candidates(&[0], &BTreeSet::new(), 3);
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().any(|c| c.indices == vec![0, 1] && c.flipped.is_empty()));
        assert!(candidates.iter().any(|c| c.indices == vec![0, 1] && c.flipped == BTreeSet::from([1])));
    }

    #[test]
    fn argmax_picks_highest_metric() {
        assert_eq!(argmax(&[0.2, 0.9, 0.5]), Some((1, 0.9)));
    }

    #[test]
    fn argmax_breaks_ties_toward_earliest_index() {
        assert_eq!(argmax(&[0.5, 0.9, 0.9, 0.1]), Some((1, 0.9)));
    }
}
