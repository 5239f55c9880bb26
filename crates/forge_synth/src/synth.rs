//! The credit-budgeted game-code synthesis and repair loop.

use crate::checkpoint::{
    analysis_history_path, candidate_path, no_val_path, select_final_code, test_pass_path, validation_pass_path,
    FinalSelection,
};
use crate::config::SynthConfig;
use crate::history::{self, ValidationRecord};
use crate::region::Wrapped;
use forge_judge::{judge, JudgeConfig, JudgeOutcome};
use forge_oracle::{ChatSequence, Message, OracleClient};
use forge_retrieval::snippet::SnippetIndex;
use forge_runner::{run_with_repetition, ModuleFactory, RepetitionResult};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Compiles a candidate's full source text into something the sandboxed
/// runner can execute. Stands in for the original system's ability to
/// `exec()` freshly generated source directly: forge has no safe runtime
/// compilation primitive, so the synthesis loop is parameterized over this
/// trait instead of assuming one.
pub trait CandidateCompiler: Send + Sync {
    /// Attempts to turn `source` into a runnable factory. An `Err` is
    /// treated the same as a failed trial: its message becomes the failure
    /// text fed back into the next patch request.
    fn compile(&self, source: &str) -> std::result::Result<Arc<dyn ModuleFactory>, String>;
}

/// Consecutive dead-log validation restarts tolerated before a candidate
/// that otherwise executes cleanly is accepted outright. Without a cap, a
/// transcript that is always too short to judge would restart forever
/// while credits keep climbing from the execute reward, and the loop would
/// never reach its `max_edits`/credit exhaustion exit.
const MAX_CONSECUTIVE_DEAD_LOGS: u32 = 3;

/// Outcome of a completed (or exhausted) synthesis run.
#[derive(Debug, Clone)]
pub struct SynthOutcome {
    pub selection: FinalSelection,
    pub edit_count: u32,
    pub credits_remaining: i64,
}

/// Runs the synthesis loop for one game until it succeeds, exhausts its
/// credit budget, or hits `max_edits`.
///
/// # Errors
///
/// Returns an error only for filesystem/serialization failures; candidate
/// failures are handled internally as patch-and-retry turns.
#[allow(clippy::too_many_lines)]
pub async fn synthesize(
    oracle: &OracleClient,
    compiler: &dyn CandidateCompiler,
    retrieval: Option<&SnippetIndex>,
    game: &str,
    scratch_dir: &Path,
    rules_text: &str,
    initial_source: String,
    config: &SynthConfig,
) -> crate::error::Result<SynthOutcome> {
    std::fs::create_dir_all(scratch_dir)?;

    let mut current_source = initial_source;
    let mut credits = config.init_credits;
    let mut edit_count: u32 = 0;
    let mut first_success_done = false;
    let mut temp_id: u64 = 0;
    let mut consecutive_dead_logs: u32 = 0;
    let history_path = analysis_history_path(scratch_dir, game);
    let judge_config = JudgeConfig {
        patch_language_tag: config.patch_language_tag.clone(),
        ..JudgeConfig::default()
    };

    while credits > 0 && edit_count < config.max_edits {
        temp_id += 1;
        std::fs::write(candidate_path(scratch_dir, game, temp_id), &current_source)?;

        let trial = run_trial(compiler, scratch_dir, game, temp_id, current_source.as_str(), config)?;
        credits += trial.completed_count as i64 * config.execute_reward;

        if !trial.success {
            let failure_text = trial
                .error_paths
                .last()
                .and_then(|p| std::fs::read_to_string(p).ok())
                .unwrap_or_default();
            warn!("game={game} trial failed on edit {edit_count}: {failure_text}");

            let wrapped = Wrapped::split(&current_source);
            let response = request_fix(oracle, rules_text, &wrapped.core, &failure_text, config).await?;
            let patched_core = forge_patch::apply_edits(&response, &wrapped.core, &config.patch_language_tag);
            let patched_core = forge_patch::neutralize_prints(&patched_core);
            current_source = wrapped.reattach(&patched_core);

            edit_count += 1;
            credits -= 1;
            if failure_text.contains("infinite loop") {
                credits += config.loop_penalty;
            }
            cleanup_trial_files(&trial);
            continue;
        }

        if !first_success_done {
            std::fs::write(no_val_path(scratch_dir, game), &current_source)?;
            first_success_done = true;
        }
        std::fs::write(test_pass_path(scratch_dir, game), &current_source)?;

        if !config.enable_validation {
            std::fs::write(validation_pass_path(scratch_dir, game, 1), &current_source)?;
            cleanup_trial_files(&trial);
            break;
        }

        let mut restarted = false;
        let mut accepted_dead_log = false;
        let checked = config.validate_repetition.min(trial.transcript_paths.len());
        for i in 1..=checked as u32 {
            let transcript = std::fs::read_to_string(&trial.transcript_paths[(i - 1) as usize]).unwrap_or_default();
            let outcome = judge(
                oracle,
                retrieval,
                rules_text,
                &current_source,
                &transcript,
                &judge_config,
            )
            .await;

            match outcome {
                JudgeOutcome::Pass => {
                    consecutive_dead_logs = 0;
                    credits += config.validate_reward;
                    std::fs::write(validation_pass_path(scratch_dir, game, i), &current_source)?;
                }
                JudgeOutcome::DeadLog => {
                    consecutive_dead_logs += 1;
                    if consecutive_dead_logs >= MAX_CONSECUTIVE_DEAD_LOGS {
                        info!(
                            "game={game} validation transcript {i} was too short to judge {consecutive_dead_logs} times \
                             in a row, accepting the candidate as-is"
                        );
                        std::fs::write(validation_pass_path(scratch_dir, game, i), &current_source)?;
                        accepted_dead_log = true;
                    } else {
                        info!("game={game} validation transcript {i} was too short to judge, restarting");
                        restarted = true;
                    }
                    break;
                }
                JudgeOutcome::Patched { summary, quote, patched_source } => {
                    consecutive_dead_logs = 0;
                    history::append(
                        &history_path,
                        ValidationRecord {
                            text_summary: summary,
                            markdown_quote: quote,
                            code_edits: vec![],
                        },
                    )?;
                    current_source = patched_source;
                    edit_count += 1;
                    credits -= 1;
                    restarted = true;
                    break;
                }
            }
        }

        cleanup_trial_files(&trial);
        if accepted_dead_log {
            break;
        }
        if restarted {
            continue;
        }
        break;
    }

    let selection = select_final_code(scratch_dir, game);
    Ok(SynthOutcome {
        selection,
        edit_count,
        credits_remaining: credits,
    })
}

fn run_trial(
    compiler: &dyn CandidateCompiler,
    scratch_dir: &Path,
    game: &str,
    temp_id: u64,
    source: &str,
    config: &SynthConfig,
) -> crate::error::Result<RepetitionResult> {
    match compiler.compile(source) {
        Ok(factory) => Ok(run_with_repetition(
            &factory,
            scratch_dir,
            &format!("{game}_{temp_id}"),
            temp_id,
            config.trial_repetitions,
            &config.runner,
        )?),
        Err(message) => {
            let error_path = scratch_dir.join(format!("{game}_{temp_id}_0_error.log"));
            std::fs::write(&error_path, &message)?;
            Ok(RepetitionResult {
                success: false,
                transcript_paths: vec![],
                error_paths: vec![error_path],
                completed_count: 0,
            })
        }
    }
}

async fn request_fix(
    oracle: &OracleClient,
    rules_text: &str,
    core_source: &str,
    failure_text: &str,
    config: &SynthConfig,
) -> forge_oracle::Result<String> {
    let sequence = ChatSequence::single_turn(format!(
        "Rules:\n{rules_text}\n\nCurrent implementation core:\n{core_source}\n\nFailure:\n{failure_text}\n"
    ))
    .with_system(
        "The game code above failed a random-play trial. Propose a minimal fix as one or \
         more SEARCH/REPLACE blocks fenced with the given language tag. Watch for empty-deck \
         and infinite-reshuffle hazards, and add commentator-style informational logs where \
         useful.",
    )
    .with_message(Message::user(format!(
        "Respond with SEARCH/REPLACE blocks fenced as ```{}```.",
        config.patch_language_tag
    )));
    oracle.chat(&sequence).await
}

fn cleanup_trial_files(trial: &RepetitionResult) {
    for path in trial.transcript_paths.iter().chain(trial.error_paths.iter()) {
        let _ = std::fs::remove_file(path);
    }
}
