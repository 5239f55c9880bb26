//! Candidate and checkpoint filenames under a game's scratch directory.

use std::path::{Path, PathBuf};

#[must_use]
pub fn candidate_path(scratch_dir: &Path, game: &str, temp_id: u64) -> PathBuf {
    scratch_dir.join(format!("{game}_{temp_id}.rs"))
}

#[must_use]
pub fn no_val_path(scratch_dir: &Path, game: &str) -> PathBuf {
    scratch_dir.join(format!("{game}-no-val.rs"))
}

#[must_use]
pub fn test_pass_path(scratch_dir: &Path, game: &str) -> PathBuf {
    scratch_dir.join(format!("{game}-test-pass.rs"))
}

#[must_use]
pub fn validation_pass_path(scratch_dir: &Path, game: &str, i: u32) -> PathBuf {
    scratch_dir.join(format!("{game}-validation-pass-{i}.rs"))
}

#[must_use]
pub fn analysis_history_path(scratch_dir: &Path, game: &str) -> PathBuf {
    scratch_dir.join(format!("{game}_analysis_history.json"))
}

#[must_use]
pub fn chat_log_path(scratch_dir: &Path, game: &str) -> PathBuf {
    scratch_dir.join(format!("{game}_llm_chat.log"))
}

#[must_use]
pub fn structured_rules_path(scratch_dir: &Path, game: &str) -> PathBuf {
    scratch_dir.join(format!("{game}.md"))
}

/// The result of picking the final code for a finished (or exhausted)
/// synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSelection {
    pub source: String,
    pub quality_score: i64,
}

/// Picks the highest-index `<game>-validation-pass-<i>.rs` checkpoint
/// present, falling back to `<game>-test-pass.rs` with score 0, or empty
/// code with score -1 if neither exists.
///
/// Checkpoints are written with contiguous indices starting at 1, so the
/// highest index present is found by probing upward until a gap appears.
#[must_use]
pub fn select_final_code(scratch_dir: &Path, game: &str) -> FinalSelection {
    let mut best: Option<(u32, String)> = None;
    let mut i = 1;
    loop {
        let path = validation_pass_path(scratch_dir, game, i);
        match std::fs::read_to_string(&path) {
            Ok(source) => {
                best = Some((i, source));
                i += 1;
            }
            Err(_) => break,
        }
    }
    if let Some((i, source)) = best {
        return FinalSelection {
            source,
            quality_score: i64::from(i),
        };
    }
    if let Ok(source) = std::fs::read_to_string(test_pass_path(scratch_dir, game)) {
        return FinalSelection { source, quality_score: 0 };
    }
    FinalSelection {
        source: String::new(),
        quality_score: -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("forge-synth-test-{name}-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        dir
    }

    #[test]
    fn selects_highest_validation_pass_index() {
        let dir = scratch_dir("select-highest");
        std::fs::write(validation_pass_path(&dir, "uno", 1), "v1").unwrap();
        std::fs::write(validation_pass_path(&dir, "uno", 2), "v2").unwrap();
        let selected = select_final_code(&dir, "uno");
        assert_eq!(selected.quality_score, 2);
        assert_eq!(selected.source, "v2");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn falls_back_to_test_pass_when_no_validation_checkpoint() {
        let dir = scratch_dir("select-fallback");
        std::fs::write(test_pass_path(&dir, "uno"), "tp").unwrap();
        let selected = select_final_code(&dir, "uno");
        assert_eq!(selected.quality_score, 0);
        assert_eq!(selected.source, "tp");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn falls_back_to_empty_code_when_nothing_exists() {
        let dir = scratch_dir("select-empty");
        let selected = select_final_code(&dir, "uno");
        assert_eq!(selected.quality_score, -1);
        assert_eq!(selected.source, "");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
