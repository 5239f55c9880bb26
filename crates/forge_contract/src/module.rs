//! The game-module and agent contracts synthesized code must satisfy.

use crate::error::Result;
use crate::state::{Action, GameState};
use rand::Rng;

/// One seated participant. `eval_step` returns both the chosen action and an
/// info map a caller can inspect (probabilities, scores); `step` is the
/// convenience form that discards the info map.
pub trait Agent: Send {
    /// Chooses an action given the current state and its legal actions.
    /// Returns `None` when `legal_actions` is empty.
    fn eval_step(&mut self, state: &GameState, legal_actions: &[Action]) -> Option<Action>;

    /// Convenience wrapper around `eval_step` for callers that don't need
    /// the info map.
    fn step(&mut self, state: &GameState, legal_actions: &[Action]) -> Option<Action> {
        self.eval_step(state, legal_actions)
    }
}

/// Chooses uniformly at random among the legal actions. Used to drive the
/// sandboxed runner's trials and as opponents in self-play tournaments.
pub struct RandomAgent {
    rng: rand::rngs::StdRng,
}

impl RandomAgent {
    /// Builds a random agent seeded for reproducibility.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn eval_step(&mut self, _state: &GameState, legal_actions: &[Action]) -> Option<Action> {
        if legal_actions.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..legal_actions.len());
        Some(legal_actions[idx].clone())
    }
}

/// The contract every synthesized or fixture game module must implement.
///
/// This is the Rust expression of the original `LLMGame` class: a module
/// knows how to set up initial state, enumerate legal actions, advance a
/// round given a chosen action, and score a finished game.
pub trait GameModule: Send {
    /// Builds the initial state for the given seat count.
    fn initiation(&self, num_players: usize) -> GameState;

    /// Advances the state by one action. Must error rather than panic on an
    /// illegal action or other rule violation.
    fn proceed_round(&self, action: &Action, state: &GameState) -> Result<GameState>;

    /// Lists legal actions for the current player in `state`. Must never
    /// return an empty list while `state.common.is_over` is false.
    fn get_legal_actions(&self, state: &GameState) -> Vec<Action>;

    /// Computes a payoff per seat for a finished game.
    fn get_payoffs(&self, state: &GameState) -> Vec<f64>;

    /// Installs the agents that will play each seat.
    fn set_agents(&mut self, agents: Vec<Box<dyn Agent>>);

    /// Resets to a fresh initial state, returning it.
    fn reset(&mut self) -> GameState;

    /// Applies one action to `state`, validating it against
    /// `get_legal_actions` first.
    fn step(&self, state: &GameState, action: &Action) -> Result<GameState> {
        let legal = self.get_legal_actions(state);
        if legal.is_empty() && !state.common.is_over {
            return Err(crate::error::Error::EmptyLegalActions);
        }
        if !legal.iter().any(|a| a == action) {
            return Err(crate::error::Error::IllegalAction(action.name.clone()));
        }
        self.proceed_round(action, state)
    }

    /// Plays a full game to completion using the installed agents, returning
    /// the final payoffs. Implementations provide this by looping
    /// `get_legal_actions` → agent choice → `step` until `is_over`.
    fn run(&mut self) -> Result<Vec<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_agent_returns_none_for_no_actions() {
        let mut agent = RandomAgent::new(1);
        let state = GameState::new(2);
        assert!(agent.eval_step(&state, &[]).is_none());
    }

    #[test]
    fn random_agent_picks_from_legal_actions() {
        let mut agent = RandomAgent::new(7);
        let state = GameState::new(2);
        let actions = vec![Action::named("a"), Action::named("b")];
        let chosen = agent.eval_step(&state, &actions).unwrap();
        assert!(actions.contains(&chosen));
    }
}
