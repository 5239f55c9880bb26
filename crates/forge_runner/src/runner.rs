//! Thread-isolated, cancellable execution of a candidate game module.

use crate::error::Result;
use forge_contract::{Agent, GameModule, RandomAgent};
use std::io::Read;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// How many trailing characters of a timed-out trial's transcript to
/// include in the synthetic timeout message.
const TRANSCRIPT_TAIL_CHARS: usize = 6000;

/// Builds a fresh `GameModule` instance for one trial. Implementations own
/// whatever the candidate needs to wire its own commentary logging to
/// `transcript_path` — the runner only truncates the file and reads its
/// tail on timeout; writing gameplay commentary is the module's job.
pub trait ModuleFactory: Send + Sync {
    /// Constructs a module configured for one trial.
    fn build(&self, seed: u64, transcript_path: &Path, enable_info: bool) -> Box<dyn GameModule>;
}

/// Per-trial configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Wall-clock budget for a single trial.
    pub timeout: Duration,
    /// Number of random agents to seat.
    pub num_players: usize,
    /// Whether the module should emit verbose informational logs.
    pub enable_info: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            num_players: 2,
            enable_info: false,
        }
    }
}

type ThreadOutcome = std::thread::Result<forge_contract::Result<Vec<f64>>>;

/// Runs one random-play trial of a candidate module.
///
/// Truncates `transcript_path` and `error_path`, builds the module via
/// `factory`, seats `config.num_players` random agents, and calls `run()` on
/// a dedicated worker thread. Returns `true` iff the trial completed without
/// error inside the timeout.
///
/// # Errors
///
/// Returns an error only if the transcript/error files cannot be prepared;
/// failures inside the candidate are reported via the return value and the
/// error file's contents, not as a `Result::Err`.
pub fn run_random_trial(
    factory: &Arc<dyn ModuleFactory>,
    transcript_path: &Path,
    error_path: &Path,
    seed: u64,
    config: &RunnerConfig,
) -> Result<bool> {
    std::fs::File::create(transcript_path)?;
    std::fs::File::create(error_path)?;

    let (tx, rx) = mpsc::channel::<ThreadOutcome>();
    let factory = Arc::clone(factory);
    let transcript_path_owned = transcript_path.to_path_buf();
    let num_players = config.num_players;
    let enable_info = config.enable_info;

    std::thread::Builder::new()
        .name(format!("forge-trial-{seed}"))
        .spawn(move || {
            let mut module = factory.build(seed, &transcript_path_owned, enable_info);
            let agents: Vec<Box<dyn Agent>> = (0..num_players)
                .map(|i| Box::new(RandomAgent::new(seed.wrapping_add(i as u64))) as Box<dyn Agent>)
                .collect();
            module.set_agents(agents);
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| module.run()));
            // The worker may be abandoned by the caller on timeout; a
            // dropped receiver makes this send a no-op rather than a panic.
            let _ = tx.send(outcome);
        })
        .expect("failed to spawn trial worker thread");

    match rx.recv_timeout(config.timeout) {
        Ok(Ok(Ok(_payoffs))) => Ok(true),
        Ok(Ok(Err(game_err))) => {
            std::fs::write(error_path, format!("{game_err}\n"))?;
            Ok(false)
        }
        Ok(Err(panic)) => {
            let message = panic_message(&panic);
            std::fs::write(error_path, format!("{message}\n"))?;
            Ok(false)
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!("trial seed={seed} timed out after {:?}", config.timeout);
            let tail = read_tail(transcript_path, TRANSCRIPT_TAIL_CHARS).unwrap_or_default();
            let message = format!(
                "Execution timed out. Probably an infinite loop, infinite reshuffling the \
                 deck, or lack of game ending condition. Please infer from the last few \
                 turns of game play (if successfully generated) below:\n```\n{tail}\n```\n"
            );
            std::fs::write(error_path, message)?;
            Ok(false)
            // The worker thread is intentionally abandoned here, not joined:
            // there is no portable way to force-stop it, matching the
            // documented thread-leak trade-off.
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            std::fs::write(error_path, "trial worker thread disconnected unexpectedly\n")?;
            Ok(false)
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "trial panicked with a non-string payload".to_string()
    }
}

/// Reads up to `max_chars` trailing characters of `path`, aligned to whole
/// lines from the end.
fn read_tail(path: &Path, max_chars: usize) -> Result<String> {
    let mut content = String::new();
    std::fs::File::open(path)?.read_to_string(&mut content)?;
    if content.len() <= max_chars {
        return Ok(content);
    }
    let lines: Vec<&str> = content.split('\n').collect();
    let mut collected = String::new();
    for line in lines.iter().rev() {
        if collected.len() + line.len() + 1 > max_chars {
            break;
        }
        if collected.is_empty() {
            collected.push_str(line);
        } else {
            collected = format!("{line}\n{collected}");
        }
    }
    Ok(collected)
}

/// Result of a multi-trial repetition run.
#[derive(Debug, Clone)]
pub struct RepetitionResult {
    /// Whether every trial up to and including the last attempted succeeded.
    pub success: bool,
    /// Transcript paths created, one per attempted trial.
    pub transcript_paths: Vec<PathBuf>,
    /// Error paths created, one per attempted trial.
    pub error_paths: Vec<PathBuf>,
    /// Number of trials that completed successfully before the first
    /// failure (or all of them, if none failed).
    pub completed_count: usize,
}

/// Runs up to `repetitions` independent trials with distinct seeds derived
/// from `base_seed`, short-circuiting on the first failure.
///
/// # Errors
///
/// Returns an error only if a trial's files cannot be prepared.
pub fn run_with_repetition(
    factory: &Arc<dyn ModuleFactory>,
    scratch_dir: &Path,
    label: &str,
    base_seed: u64,
    repetitions: usize,
    config: &RunnerConfig,
) -> Result<RepetitionResult> {
    let mut transcript_paths = Vec::new();
    let mut error_paths = Vec::new();
    let mut completed_count = 0;
    let mut success = true;

    for i in 0..repetitions {
        let transcript_path = scratch_dir.join(format!("{label}_{i}_transcript.log"));
        let error_path = scratch_dir.join(format!("{label}_{i}_error.log"));
        let ok = run_random_trial(
            factory,
            &transcript_path,
            &error_path,
            base_seed.wrapping_add(i as u64),
            config,
        )?;
        transcript_paths.push(transcript_path);
        error_paths.push(error_path);
        if ok {
            completed_count += 1;
        } else {
            success = false;
            break;
        }
    }

    Ok(RepetitionResult {
        success,
        transcript_paths,
        error_paths,
        completed_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_contract::fixtures::HighCardGame;

    struct HighCardFactory;

    impl ModuleFactory for HighCardFactory {
        fn build(&self, seed: u64, _transcript_path: &Path, _enable_info: bool) -> Box<dyn GameModule> {
            Box::new(HighCardGame::new(seed))
        }
    }

    struct TimeoutFactory;

    struct SpinningModule;

    impl GameModule for SpinningModule {
        fn initiation(&self, num_players: usize) -> forge_contract::GameState {
            forge_contract::GameState::new(num_players)
        }
        fn proceed_round(
            &self,
            _action: &forge_contract::Action,
            state: &forge_contract::GameState,
        ) -> forge_contract::Result<forge_contract::GameState> {
            Ok(state.clone())
        }
        fn get_legal_actions(&self, _state: &forge_contract::GameState) -> Vec<forge_contract::Action> {
            vec![forge_contract::Action::named("noop")]
        }
        fn get_payoffs(&self, _state: &forge_contract::GameState) -> Vec<f64> {
            vec![0.0]
        }
        fn set_agents(&mut self, _agents: Vec<Box<dyn Agent>>) {}
        fn reset(&mut self) -> forge_contract::GameState {
            self.initiation(1)
        }
        fn run(&mut self) -> forge_contract::Result<Vec<f64>> {
            loop {
                std::thread::sleep(Duration::from_millis(20));
            }
        }
    }

    impl ModuleFactory for TimeoutFactory {
        fn build(&self, _seed: u64, _transcript_path: &Path, _enable_info: bool) -> Box<dyn GameModule> {
            Box::new(SpinningModule)
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("forge-runner-test-{name}-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        dir
    }

    #[test]
    fn successful_trial_leaves_empty_error_file() {
        let dir = scratch_dir("success");
        let factory: Arc<dyn ModuleFactory> = Arc::new(HighCardFactory);
        let config = RunnerConfig::default();
        let ok = run_random_trial(
            &factory,
            &dir.join("t.log"),
            &dir.join("e.log"),
            1,
            &config,
        )
        .unwrap();
        assert!(ok);
        assert_eq!(std::fs::metadata(dir.join("e.log")).unwrap().len(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn timed_out_trial_reports_failure_with_message() {
        let dir = scratch_dir("timeout");
        let factory: Arc<dyn ModuleFactory> = Arc::new(TimeoutFactory);
        let config = RunnerConfig {
            timeout: Duration::from_millis(50),
            num_players: 1,
            enable_info: false,
        };
        let ok = run_random_trial(
            &factory,
            &dir.join("t.log"),
            &dir.join("e.log"),
            1,
            &config,
        )
        .unwrap();
        assert!(!ok);
        let error_text = std::fs::read_to_string(dir.join("e.log")).unwrap();
        assert!(error_text.contains("Execution timed out"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn repetition_stops_at_first_failure() {
        let dir = scratch_dir("repetition");
        let factory: Arc<dyn ModuleFactory> = Arc::new(HighCardFactory);
        let config = RunnerConfig::default();
        let result = run_with_repetition(&factory, &dir, "game", 1, 3, &config).unwrap();
        assert!(result.success);
        assert_eq!(result.completed_count, 3);
        assert_eq!(result.transcript_paths.len(), 3);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
