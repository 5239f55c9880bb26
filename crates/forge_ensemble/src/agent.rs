//! A weighted ensemble of heuristic feature functions acting as one agent.

use crate::error::{Error, Result};
use forge_contract::{Action, GameState};
use forge_heuristic::HeuristicFunction;
use forge_oracle::OracleClient;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Fixed softmax temperature the scores are converted to probabilities
/// with, independent of the exploration `temperature` passed to `choose`.
const SOFTMAX_TEMPERATURE: f64 = 0.1;

/// Diagnostic info returned alongside the chosen action.
#[derive(Debug, Clone)]
pub struct ChoiceInfo {
    pub probs: Vec<f64>,
    pub legal_actions: Vec<Action>,
    pub scores: Vec<f64>,
}

/// A weighted combination of heuristic feature functions.
#[derive(Debug, Clone)]
pub struct EnsembleAgent {
    pub game_description: String,
    pub io_description: String,
    pub policy_list: Vec<String>,
    pub feature_functions: Vec<HeuristicFunction>,
    pub weights: Vec<f64>,
    pub flipped: BTreeSet<usize>,
}

impl EnsembleAgent {
    /// Builds an ensemble with uniform weights and no sign flips.
    #[must_use]
    pub fn new(
        game_description: String,
        io_description: String,
        policy_list: Vec<String>,
        feature_functions: Vec<HeuristicFunction>,
    ) -> Self {
        let n = feature_functions.len();
        let weight = if n == 0 { 0.0 } else { 1.0 / n as f64 };
        Self {
            game_description,
            io_description,
            policy_list,
            feature_functions,
            weights: vec![weight; n],
            flipped: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_flipped(mut self, flipped: BTreeSet<usize>) -> Self {
        self.flipped = flipped;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = weights;
        self
    }

    /// Chooses an action among `legal_actions`.
    ///
    /// With probability `temperature`, samples uniformly at random;
    /// otherwise takes the argmax of `w . f(a)`, breaking ties uniformly at
    /// random among the maxima. `temperature = 0.0` is fully deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if `legal_actions` is empty.
    pub async fn choose(
        &mut self,
        oracle: &OracleClient,
        state: &GameState,
        legal_actions: &[Action],
        temperature: f64,
        rng: &mut StdRng,
    ) -> Result<(Action, ChoiceInfo)> {
        if legal_actions.is_empty() {
            return Err(Error::EmptyLegalActions);
        }

        let mut scores = Vec::with_capacity(legal_actions.len());
        for action in legal_actions {
            let mut score = 0.0;
            for (i, function) in self.feature_functions.iter_mut().enumerate() {
                let mut value = function.invoke(oracle, state, action, rng).await;
                if self.flipped.contains(&i) {
                    value = -value;
                }
                score += self.weights.get(i).copied().unwrap_or(0.0) * value;
            }
            scores.push(score);
        }

        let probs = softmax(&scores, SOFTMAX_TEMPERATURE);

        let chosen_index = if rng.gen_range(0.0..1.0) < temperature {
            rng.gen_range(0..legal_actions.len())
        } else {
            argmax_tiebroken(&scores, rng)
        };

        let info = ChoiceInfo {
            probs,
            legal_actions: legal_actions.to_vec(),
            scores,
        };
        Ok((legal_actions[chosen_index].clone(), info))
    }
}

fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| ((s - max) / temperature).exp()).collect();
    let total: f64 = exps.iter().sum();
    if total == 0.0 {
        vec![1.0 / scores.len() as f64; scores.len()]
    } else {
        exps.into_iter().map(|e| e / total).collect()
    }
}

fn argmax_tiebroken(scores: &[f64], rng: &mut StdRng) -> usize {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let maxima: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| (**s - max).abs() < f64::EPSILON)
        .map(|(i, _)| i)
        .collect();
    maxima[rng.gen_range(0..maxima.len())]
}

/// Bridges an [`EnsembleAgent`]'s async `choose` to the synchronous
/// [`forge_contract::Agent`] contract every `GameModule` plays against, by
/// blocking on a private single-threaded runtime owned by the seat.
///
/// Only safe to use from a plain OS thread, never from inside an
/// already-running `tokio` executor — callers that drive self-play from a
/// `std::thread` pool (tournament evaluation, fix-by-playing) are fine;
/// callers already inside `#[tokio::main]` are not.
pub struct SyncSeat {
    agent: EnsembleAgent,
    oracle: Arc<OracleClient>,
    rng: StdRng,
    temperature: f64,
    runtime: tokio::runtime::Runtime,
}

impl SyncSeat {
    /// # Panics
    ///
    /// Panics if the private runtime cannot be built.
    #[must_use]
    pub fn new(agent: EnsembleAgent, oracle: Arc<OracleClient>, seed: u64, temperature: f64) -> Self {
        Self {
            agent,
            oracle,
            rng: StdRng::seed_from_u64(seed),
            temperature,
            runtime: tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build sync-seat runtime"),
        }
    }

    #[must_use]
    pub fn into_agent(self) -> EnsembleAgent {
        self.agent
    }
}

impl forge_contract::Agent for SyncSeat {
    fn eval_step(&mut self, state: &GameState, legal_actions: &[Action]) -> Option<Action> {
        if legal_actions.is_empty() {
            return None;
        }
        let Self { agent, oracle, rng, temperature, runtime } = self;
        runtime
            .block_on(agent.choose(oracle, state, legal_actions, *temperature, rng))
            .ok()
            .map(|(action, _info)| action)
    }
}

/// Like [`SyncSeat`], but holds its ensemble behind an `Arc<Mutex<_>>`
/// instead of owning it outright.
///
/// `GameModule::set_agents` takes ownership of each seat for the duration
/// of one game, so an owned [`SyncSeat`] loses any state a heuristic
/// function's self-repair mutated once that game's module is dropped.
/// Fix-by-playing needs the opposite: the same ensemble, repaired in place,
/// replayed across several games (mirroring the original's single
/// in-memory agent object reused across a repetition loop). A caller seats
/// a fresh `SharedSeat` each game, cloning the same `Arc`, so mutations
/// made during game N are visible in game N+1.
pub struct SharedSeat {
    agent: Arc<std::sync::Mutex<EnsembleAgent>>,
    oracle: Arc<OracleClient>,
    rng: StdRng,
    temperature: f64,
    runtime: tokio::runtime::Runtime,
}

impl SharedSeat {
    /// # Panics
    ///
    /// Panics if the private runtime cannot be built.
    #[must_use]
    pub fn new(agent: Arc<std::sync::Mutex<EnsembleAgent>>, oracle: Arc<OracleClient>, seed: u64, temperature: f64) -> Self {
        Self {
            agent,
            oracle,
            rng: StdRng::seed_from_u64(seed),
            temperature,
            runtime: tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build shared-seat runtime"),
        }
    }
}

impl forge_contract::Agent for SharedSeat {
    fn eval_step(&mut self, state: &GameState, legal_actions: &[Action]) -> Option<Action> {
        if legal_actions.is_empty() {
            return None;
        }
        let mut guard = self.agent.lock().expect("ensemble mutex poisoned");
        self.runtime
            .block_on(guard.choose(&self.oracle, state, legal_actions, self.temperature, &mut self.rng))
            .ok()
            .map(|(action, _info)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0], 0.1);
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn argmax_breaks_ties_among_maxima() {
        use rand::SeedableRng;
        let mut rng = StdRng::seed_from_u64(7);
        let index = argmax_tiebroken(&[1.0, 3.0, 3.0, 0.0], &mut rng);
        assert!(index == 1 || index == 2);
    }
}
