//! Shared, mutex-guarded token usage counters.

use std::sync::{Arc, Mutex};

/// A snapshot of accumulated token usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Usage {
    /// Tokens spent on prompts sent to the oracle.
    pub prompt_tokens: u64,
    /// Tokens spent on oracle completions received.
    pub completion_tokens: u64,
    /// Tokens spent on embedding requests.
    pub embedding_tokens: u64,
}

/// Process-wide mutable usage state, threaded explicitly rather than as a
/// global: the oracle client owns one and hands out clones of the handle to
/// anything that shares its credentials.
#[derive(Debug, Clone, Default)]
pub struct UsageLedger(Arc<Mutex<Usage>>);

impl UsageLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed chat turn's token counts.
    pub fn record_chat(&self, prompt_tokens: u64, completion_tokens: u64) {
        let mut usage = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        usage.prompt_tokens += prompt_tokens;
        usage.completion_tokens += completion_tokens;
    }

    /// Records an embedding request's token count.
    pub fn record_embedding(&self, tokens: u64) {
        let mut usage = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        usage.embedding_tokens += tokens;
    }

    /// Reads the current totals.
    #[must_use]
    pub fn snapshot(&self) -> Usage {
        *self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_accumulates_across_clones() {
        let ledger = UsageLedger::new();
        let other = ledger.clone();
        ledger.record_chat(10, 5);
        other.record_chat(3, 2);
        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.prompt_tokens, 13);
        assert_eq!(snapshot.completion_tokens, 7);
    }

    #[test]
    fn embedding_tokens_tracked_separately() {
        let ledger = UsageLedger::new();
        ledger.record_embedding(42);
        assert_eq!(ledger.snapshot().embedding_tokens, 42);
    }
}
