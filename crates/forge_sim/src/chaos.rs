//! Deterministic fault injection against rules text, patch blobs, and
//! transcripts, grounded in the reference workspace's `ChaosInjector` but
//! retargeted at this workspace's own artifacts.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Configuration for chaos injection.
#[derive(Debug, Clone)]
pub struct ChaosConfig {
    pub seed: u64,
    /// Probability of corrupting a patch block instead of leaving it intact.
    pub patch_corruption_rate: f64,
    /// Probability of truncating rules text mid-sentence.
    pub rules_truncation_rate: f64,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self { seed: 42, patch_corruption_rate: 0.3, rules_truncation_rate: 0.3 }
    }
}

impl ChaosConfig {
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_patch_corruption_rate(mut self, rate: f64) -> Self {
        self.patch_corruption_rate = rate;
        self
    }

    #[must_use]
    pub const fn with_rules_truncation_rate(mut self, rate: f64) -> Self {
        self.rules_truncation_rate = rate;
        self
    }
}

/// Kinds of corruption `ChaosInjector` can apply to a patch block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchCorruption {
    /// Drop the closing `>>>>>>> REPLACE` marker, as if the model's
    /// response was cut off mid-stream.
    DropReplaceMarker,
    /// Drop the `=======` divider, merging SEARCH and REPLACE text.
    DropDivider,
    /// Drop the entire fenced code block, leaving only prose.
    DropFence,
}

/// A deterministic source of faults, seeded the same way the reference
/// workspace's own campaigns are.
pub struct ChaosInjector {
    config: ChaosConfig,
    rng: ChaCha8Rng,
}

impl ChaosInjector {
    #[must_use]
    pub fn new(config: ChaosConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Corrupts a well-formed patch response, simulating a truncated or
    /// malformed LLM reply. Returns the corrupted text and which corruption
    /// (if any) was applied.
    pub fn corrupt_patch_response(&mut self, raw: &str) -> (String, Option<PatchCorruption>) {
        if !self.rng.gen_bool(self.config.patch_corruption_rate) {
            return (raw.to_string(), None);
        }
        let kinds = [PatchCorruption::DropReplaceMarker, PatchCorruption::DropDivider, PatchCorruption::DropFence];
        let kind = *kinds.choose(&mut self.rng).expect("corruption kind list is non-empty");
        let corrupted = match kind {
            PatchCorruption::DropReplaceMarker => raw.replacen(">>>>>>> REPLACE", "", 1),
            PatchCorruption::DropDivider => raw.replacen("=======\n", "", 1),
            PatchCorruption::DropFence => raw.replacen("```", "", 2),
        };
        (corrupted, Some(kind))
    }

    /// Truncates rules text mid-sentence and injects a run of garbage
    /// tokens, simulating a corrupted or partially-transmitted ruleset.
    #[must_use]
    pub fn corrupt_rules_text(&mut self, rules_text: &str) -> String {
        if !self.rng.gen_bool(self.config.rules_truncation_rate) || rules_text.is_empty() {
            return rules_text.to_string();
        }
        let mut cut = self.rng.gen_range(1..=rules_text.len());
        while cut > 0 && !rules_text.is_char_boundary(cut) {
            cut -= 1;
        }
        let mut truncated = rules_text[..cut].to_string();
        truncated.push_str(" %%GARBLED%% \u{0}\u{0}");
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_patch_response_is_deterministic_for_a_given_seed() {
        let raw = "```rust\n<<<<<<< SEARCH\nold\n=======\nnew\n>>>>>>> REPLACE\n```";
        let mut a = ChaosInjector::new(ChaosConfig::default().with_seed(7).with_patch_corruption_rate(1.0));
        let mut b = ChaosInjector::new(ChaosConfig::default().with_seed(7).with_patch_corruption_rate(1.0));
        assert_eq!(a.corrupt_patch_response(raw), b.corrupt_patch_response(raw));
    }

    #[test]
    fn zero_rate_never_corrupts() {
        let raw = "```rust\n<<<<<<< SEARCH\nold\n=======\nnew\n>>>>>>> REPLACE\n```";
        let mut injector = ChaosInjector::new(ChaosConfig::default().with_patch_corruption_rate(0.0));
        let (out, kind) = injector.corrupt_patch_response(raw);
        assert_eq!(out, raw);
        assert!(kind.is_none());
    }

    #[test]
    fn corrupt_rules_text_always_truncates_at_rate_one() {
        let mut injector = ChaosInjector::new(ChaosConfig::default().with_rules_truncation_rate(1.0));
        let corrupted = injector.corrupt_rules_text("Players take turns drawing cards.");
        assert!(corrupted.contains("GARBLED"));
        assert!(corrupted.len() < "Players take turns drawing cards.".len() + 20);
    }
}
