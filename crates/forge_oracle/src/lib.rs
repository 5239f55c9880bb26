//! Generative oracle client shared by every synthesis and design loop.
//!
//! Provides `chat`, `embed`, and a mutex-guarded token usage ledger. Retries
//! transport errors up to three times with a fixed backoff; parse and
//! authentication errors are surfaced immediately rather than retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_oracle::{OracleClient, OracleConfig, ChatSequence};
//!
//! let client = OracleClient::new(OracleConfig { api_key: key, ..Default::default() })?;
//! let reply = client.chat(&ChatSequence::single_turn("draft the rules")).await?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod error;
pub mod message;
pub mod usage;

pub use client::{OracleClient, OracleConfig};
pub use error::{Error, Result};
pub use message::{ChatSequence, Message, Role};
pub use usage::{Usage, UsageLedger};
