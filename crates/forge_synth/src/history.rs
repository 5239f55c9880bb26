//! Append-only validation history, persisted as a JSON array per game.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One validation turn's record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub text_summary: String,
    pub markdown_quote: Option<String>,
    pub code_edits: Vec<(String, String)>,
}

/// Loads the existing history at `path`, or an empty one if the file
/// doesn't exist yet.
pub fn load(path: &Path) -> Result<Vec<ValidationRecord>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

/// Appends `record` to the history at `path` and rewrites the file.
pub fn append(path: &Path, record: ValidationRecord) -> Result<()> {
    let mut records = load(path)?;
    records.push(record);
    std::fs::write(path, serde_json::to_string_pretty(&records)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_accumulates_across_calls() {
        let path = std::env::temp_dir().join(format!("forge-synth-history-test-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        append(
            &path,
            ValidationRecord {
                text_summary: "first".to_string(),
                markdown_quote: None,
                code_edits: vec![],
            },
        )
        .unwrap();
        append(
            &path,
            ValidationRecord {
                text_summary: "second".to_string(),
                markdown_quote: Some("\"quote\"".to_string()),
                code_edits: vec![("a".to_string(), "b".to_string())],
            },
        )
        .unwrap();

        let records = load(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text_summary, "second");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_on_missing_file_is_empty() {
        let path = std::env::temp_dir().join("forge-synth-history-test-missing.json");
        let _ = std::fs::remove_file(&path);
        assert!(load(&path).unwrap().is_empty());
    }
}
