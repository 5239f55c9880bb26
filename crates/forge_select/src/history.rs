//! Monotonic history of accepted feature-selection steps, persisted as an
//! append-only JSON array.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// One accepted step of the forward-greedy search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStep {
    pub indices: Vec<usize>,
    pub flipped: BTreeSet<usize>,
    pub metric: f64,
}

/// Reads the full history, or an empty vector if the file doesn't exist yet.
///
/// # Errors
///
/// Returns an error if the file exists but contains malformed JSON.
pub fn load(path: &Path) -> Result<Vec<HistoryStep>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Appends one step to the history file, rewriting the whole array.
///
/// # Errors
///
/// Returns an error if the existing history can't be read or the rewrite
/// can't be written.
pub fn append(path: &Path, step: HistoryStep) -> Result<()> {
    let mut steps = load(path)?;
    steps.push(step);
    let json = serde_json::to_string_pretty(&steps)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("forge_select_test_{}_{name}", std::process::id()))
    }

    #[test]
    fn load_missing_file_is_empty() {
        let path = scratch_path("missing_history.json");
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn append_accumulates_steps_in_order() {
        let path = scratch_path("append_history.json");
        std::fs::remove_file(&path).ok();

        append(&path, HistoryStep { indices: vec![0], flipped: BTreeSet::new(), metric: 0.4 }).unwrap();
        append(&path, HistoryStep { indices: vec![0, 1], flipped: BTreeSet::from([1]), metric: 0.6 }).unwrap();

        let steps = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].indices, vec![0, 1]);
        assert!((steps[1].metric - 0.6).abs() < f64::EPSILON);
    }
}
