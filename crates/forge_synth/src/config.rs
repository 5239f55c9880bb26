//! Tunable knobs for one synthesis run. Defaults are forge's own choices;
//! nothing in the source material pins exact numbers for these, so the CLI's
//! config layer (see the `forge` binary) is expected to override them per
//! deployment.

use forge_runner::RunnerConfig;

#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Starting credit balance.
    pub init_credits: i64,
    /// Hard cap on the number of edit turns.
    pub max_edits: u32,
    /// Credits earned per completed random-play execution within a trial.
    pub execute_reward: i64,
    /// Credits earned per transcript that passes validation.
    pub validate_reward: i64,
    /// Credit adjustment (negative) applied when a failure mentions
    /// "infinite loop".
    pub loop_penalty: i64,
    /// Number of random-play executions per trial (R).
    pub trial_repetitions: usize,
    /// Number of transcripts checked against the validation judge.
    pub validate_repetition: usize,
    /// When false, the first fully-passing trial is accepted without
    /// running the validation judge at all.
    pub enable_validation: bool,
    /// Number of self-refinement passes applied to the initial draft.
    pub refine_passes: u32,
    /// Number of retrieved (description, code) examples kept for prompting.
    pub final_example_num: usize,
    /// Fence language tag patch blocks are expected under.
    pub patch_language_tag: String,
    /// Per-trial sandboxing configuration.
    pub runner: RunnerConfig,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            init_credits: 30,
            max_edits: 30,
            execute_reward: 2,
            validate_reward: 5,
            loop_penalty: -5,
            trial_repetitions: 5,
            validate_repetition: 3,
            enable_validation: true,
            refine_passes: 2,
            final_example_num: 3,
            patch_language_tag: "rust".to_string(),
            runner: RunnerConfig::default(),
        }
    }
}
