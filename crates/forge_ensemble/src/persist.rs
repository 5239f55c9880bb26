//! JSON persistence for an [`EnsembleAgent`], preserving every field needed
//! to rebuild its heuristic functions without the oracle.

use crate::agent::EnsembleAgent;
use crate::error::Result;
use forge_heuristic::HeuristicFunction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedFeature {
    pub game_description: String,
    pub policy_text: String,
    pub io_description: String,
    pub source_text: String,
    pub active: bool,
    pub enable_fix: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedEnsemble {
    pub game_description: String,
    pub io_description: String,
    pub policy_list: Vec<String>,
    pub features: Vec<PersistedFeature>,
    pub weights: Vec<f64>,
    pub flipped_indices: BTreeSet<usize>,
}

impl EnsembleAgent {
    #[must_use]
    pub fn to_persisted(&self) -> PersistedEnsemble {
        let features = self
            .feature_functions
            .iter()
            .map(|f| PersistedFeature {
                game_description: f.game_description.clone(),
                policy_text: f.policy_text.clone(),
                io_description: f.io_description.clone(),
                source_text: f.source_text.clone(),
                active: f.active,
                enable_fix: f.enable_fix,
            })
            .collect();
        PersistedEnsemble {
            game_description: self.game_description.clone(),
            io_description: self.io_description.clone(),
            policy_list: self.policy_list.clone(),
            features,
            weights: self.weights.clone(),
            flipped_indices: self.flipped.clone(),
        }
    }

    #[must_use]
    pub fn from_persisted(persisted: PersistedEnsemble) -> Self {
        let feature_functions = persisted
            .features
            .into_iter()
            .map(|f| HeuristicFunction::restore(f.game_description, f.policy_text, f.io_description, f.source_text, f.active, f.enable_fix))
            .collect();
        Self {
            game_description: persisted.game_description,
            io_description: persisted.io_description,
            policy_list: persisted.policy_list,
            feature_functions,
            weights: persisted.weights,
            flipped: persisted.flipped_indices,
        }
    }
}

/// Writes an ensemble to `path` as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save(path: &Path, agent: &EnsembleAgent) -> Result<()> {
    let persisted = agent.to_persisted();
    let json = serde_json::to_string_pretty(&persisted)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Loads an ensemble previously written by [`save`].
///
/// # Errors
///
/// Returns an error if the file is missing or its JSON is malformed.
pub fn load(path: &Path) -> Result<EnsembleAgent> {
    let contents = std::fs::read_to_string(path)?;
    let persisted: PersistedEnsemble = serde_json::from_str(&contents)?;
    Ok(EnsembleAgent::from_persisted(persisted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("forge_ensemble_test_{}_{name}", std::process::id()))
    }

    #[test]
    fn round_trips_through_json() {
        let function = HeuristicFunction::restore(
            "game".to_string(),
            "policy".to_string(),
            "io".to_string(),
            "1 + 2".to_string(),
            true,
            true,
        );
        let agent = EnsembleAgent::new(
            "game".to_string(),
            "io".to_string(),
            vec!["strategy a".to_string()],
            vec![function],
        )
        .with_flipped(BTreeSet::from([0]));

        let path = scratch_path("round_trip.json");
        save(&path, &agent).unwrap();
        let restored = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(restored.game_description, "game");
        assert_eq!(restored.policy_list, vec!["strategy a".to_string()]);
        assert_eq!(restored.flipped, BTreeSet::from([0]));
        assert_eq!(restored.feature_functions.len(), 1);
        assert!(restored.feature_functions[0].active);
        assert_eq!(restored.feature_functions[0].source_text, "1 + 2");
    }
}
