//! A trivial reference game module.
//!
//! Not a product deliverable — forge never ships a concrete card game, only
//! the contract synthesized or hand-written modules implement. This fixture
//! exists so the workspace's own tests (sandboxed runner, tournament
//! evaluator, simulation harness) have something real to execute: each seat
//! draws one card in turn; whoever draws the highest value wins.

use crate::error::{Error, Result};
use crate::module::{Agent, GameModule};
use crate::state::{Action, GameState, Value};
use rand::Rng;
use std::cell::RefCell;

/// Draws a single card per seat and scores by card value.
pub struct HighCardGame {
    rng: RefCell<rand::rngs::StdRng>,
    agents: Vec<Box<dyn Agent>>,
}

impl HighCardGame {
    /// Builds a new game seeded for reproducibility.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            rng: RefCell::new(rand::rngs::StdRng::seed_from_u64(seed)),
            agents: Vec::new(),
        }
    }
}

impl GameModule for HighCardGame {
    fn initiation(&self, num_players: usize) -> GameState {
        GameState::new(num_players)
    }

    fn proceed_round(&self, action: &Action, state: &GameState) -> Result<GameState> {
        if action.name != "draw" {
            return Err(Error::IllegalAction(action.name.clone()));
        }
        let mut next = state.clone();
        let seat = next.common.current_player;
        let card = self.rng.borrow_mut().gen_range(2..=14);
        next.players[seat]
            .private
            .insert("card".to_string(), Value::Int(card));

        if seat + 1 < next.common.num_players {
            next.common.current_player = seat + 1;
        } else {
            next.common.is_over = true;
            let best = (0..next.common.num_players)
                .max_by_key(|&i| {
                    next.players[i]
                        .private
                        .get("card")
                        .and_then(Value::as_i64)
                        .unwrap_or(0)
                })
                .unwrap_or(0);
            next.common.winner = Some(best);
        }
        Ok(next)
    }

    fn get_legal_actions(&self, state: &GameState) -> Vec<Action> {
        if state.common.is_over {
            Vec::new()
        } else {
            vec![Action::named("draw")]
        }
    }

    fn get_payoffs(&self, state: &GameState) -> Vec<f64> {
        (0..state.common.num_players)
            .map(|i| {
                state.players[i]
                    .private
                    .get("card")
                    .and_then(Value::as_i64)
                    .unwrap_or(0) as f64
            })
            .collect()
    }

    fn set_agents(&mut self, agents: Vec<Box<dyn Agent>>) {
        self.agents = agents;
    }

    fn reset(&mut self) -> GameState {
        self.initiation(self.agents.len().max(1))
    }

    fn run(&mut self) -> Result<Vec<f64>> {
        let mut state = self.initiation(self.agents.len());
        loop {
            let legal = self.get_legal_actions(&state);
            if legal.is_empty() {
                break;
            }
            let seat = state.common.current_player;
            let agent = self
                .agents
                .get_mut(seat)
                .ok_or_else(|| Error::Execution(format!("no agent seated at {seat}")))?;
            let action = agent
                .eval_step(&state, &legal)
                .ok_or(Error::EmptyLegalActions)?;
            state = self.step(&state, &action)?;
        }
        Ok(self.get_payoffs(&state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::RandomAgent;

    #[test]
    fn high_card_game_runs_to_completion() {
        let mut game = HighCardGame::new(42);
        game.set_agents(vec![
            Box::new(RandomAgent::new(1)),
            Box::new(RandomAgent::new(2)),
        ]);
        let payoffs = game.run().unwrap();
        assert_eq!(payoffs.len(), 2);
    }

    #[test]
    fn legal_actions_empty_once_over() {
        let game = HighCardGame::new(1);
        let mut state = game.initiation(1);
        state.common.is_over = true;
        assert!(game.get_legal_actions(&state).is_empty());
    }
}
