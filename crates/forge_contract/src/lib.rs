//! Shared game-state, action, and module contract for forge.
//!
//! This crate has no opinion about any particular game's rules. It defines
//! the tagged-tree value representation every synthesized or hand-written
//! game module reads and writes, the `GameModule`/`Agent` traits that
//! describe what such a module must expose, and a trivial fixture module
//! used by the rest of the workspace's tests.
//!
//! # Example
//!
//! ```
//! use forge_contract::{fixtures::HighCardGame, module::{GameModule, RandomAgent, Agent}};
//!
//! let mut game = HighCardGame::new(7);
//! game.set_agents(vec![Box::new(RandomAgent::new(1)), Box::new(RandomAgent::new(2))]);
//! let payoffs = game.run().unwrap();
//! assert_eq!(payoffs.len(), 2);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod fixtures;
pub mod module;
pub mod state;
pub mod value;

pub use error::{Error, Result};
pub use module::{Agent, GameModule, RandomAgent};
pub use state::{Action, CommonState, GameState, PlayerView};
pub use value::{Card, Value};
