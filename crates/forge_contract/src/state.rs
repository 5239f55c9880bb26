//! Game state and action shapes.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields common to every game, regardless of rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonState {
    /// Number of seated players.
    pub num_players: usize,
    /// Index of the player to act next.
    pub current_player: usize,
    /// Whether the game has ended.
    pub is_over: bool,
    /// Winning seat index, if decided.
    pub winner: Option<usize>,
    /// Face-down cards not attributed to any single player.
    pub facedown_cards: Vec<Value>,
    /// Face-up cards not attributed to any single player.
    pub faceup_cards: Vec<Value>,
}

/// Per-seat view of the state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlayerView {
    /// Fields visible to every player.
    pub public: BTreeMap<String, Value>,
    /// Fields visible only to this seat.
    pub private: BTreeMap<String, Value>,
    /// This seat's face-down cards.
    pub facedown_cards: Vec<Value>,
    /// This seat's face-up cards.
    pub faceup_cards: Vec<Value>,
}

/// Full game state: common fields plus one view per seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Fields shared across all seats.
    pub common: CommonState,
    /// Per-seat views, indexed by seat.
    pub players: Vec<PlayerView>,
}

impl GameState {
    /// Builds a fresh, empty state for the given seat count.
    #[must_use]
    pub fn new(num_players: usize) -> Self {
        Self {
            common: CommonState {
                num_players,
                current_player: 0,
                is_over: false,
                winner: None,
                facedown_cards: Vec::new(),
                faceup_cards: Vec::new(),
            },
            players: (0..num_players).map(|_| PlayerView::default()).collect(),
        }
    }
}

/// A legal turn-action, e.g. `{name: "play", args: {"card": ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The action's name.
    pub name: String,
    /// Action-specific arguments.
    pub args: BTreeMap<String, Value>,
}

impl Action {
    /// Builds a nullary action.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    /// Builds an action with one argument.
    #[must_use]
    pub fn with_arg(name: impl Into<String>, key: impl Into<String>, value: Value) -> Self {
        let mut args = BTreeMap::new();
        args.insert(key.into(), value);
        Self {
            name: name.into(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_one_view_per_seat() {
        let state = GameState::new(3);
        assert_eq!(state.players.len(), 3);
        assert!(!state.common.is_over);
    }

    #[test]
    fn action_with_arg_round_trips_through_json() {
        let action = Action::with_arg("play", "card", Value::from("AS"));
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
