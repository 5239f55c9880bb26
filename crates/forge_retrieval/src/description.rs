//! Whole-example retrieval by description-embedding similarity.

use crate::error::Result;
use forge_oracle::OracleClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One scored candidate example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedExample {
    /// Filename (stem, no extension) within the library.
    pub name: String,
    /// Dot-product similarity to the query.
    pub score: f32,
}

/// A persistent dictionary mapping library filenames to description
/// embeddings, built lazily and cached on disk so repeated runs don't
/// re-embed the whole library.
#[derive(Debug, Default, Serialize, Deserialize)]
struct EmbeddingCache {
    entries: BTreeMap<String, Vec<f32>>,
}

/// Ranks whole-game examples in `library_dir` by description-embedding
/// similarity to a query. Each example is a `<name>.md` (description) paired
/// with a `<name>` code file of the caller's choosing.
pub struct DescriptionIndex {
    library_dir: PathBuf,
    cache_path: PathBuf,
}

impl DescriptionIndex {
    /// Builds an index over `library_dir`, caching embeddings at
    /// `library_dir/embeddings.json`.
    #[must_use]
    pub fn new(library_dir: impl Into<PathBuf>) -> Self {
        let library_dir = library_dir.into();
        let cache_path = library_dir.join("embeddings.json");
        Self {
            library_dir,
            cache_path,
        }
    }

    fn load_cache(&self) -> EmbeddingCache {
        std::fs::read_to_string(&self.cache_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    fn save_cache(&self, cache: &EmbeddingCache) -> Result<()> {
        let json = serde_json::to_string_pretty(cache).unwrap_or_default();
        std::fs::write(&self.cache_path, json)?;
        Ok(())
    }

    fn description_files(&self) -> Result<Vec<(String, String)>> {
        if !self.library_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.library_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path)?;
            out.push((stem.to_string(), content));
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    /// Ensures every description file in the library has a cached embedding,
    /// embedding any that are missing.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or if the oracle call fails.
    pub async fn ensure_built(&self, client: &OracleClient) -> Result<()> {
        let files = self.description_files()?;
        let mut cache = self.load_cache();
        let missing: Vec<_> = files
            .iter()
            .filter(|(name, _)| !cache.entries.contains_key(name))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        let texts: Vec<String> = missing.iter().map(|(_, text)| text.clone()).collect();
        let embeddings = client.embed(&texts).await?;
        for ((name, _), embedding) in missing.into_iter().zip(embeddings) {
            cache.entries.insert(name, embedding);
        }
        self.save_cache(&cache)?;
        Ok(())
    }

    /// Ranks the library by similarity to `query_embedding`. Deterministic
    /// given a fixed cache: ties are broken by filename order. Returns an
    /// empty list if the library is empty — callers must tolerate this.
    #[must_use]
    pub fn rank(&self, query_embedding: &[f32]) -> Vec<RankedExample> {
        let cache = self.load_cache();
        let mut ranked: Vec<RankedExample> = cache
            .entries
            .into_iter()
            .map(|(name, embedding)| RankedExample {
                name,
                score: dot(query_embedding, &embedding),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked
    }

    /// Reads the paired description and code content for the top `limit`
    /// ranked examples. The code file is looked up as `<name>.<code_ext>`.
    ///
    /// # Errors
    ///
    /// Returns an error if a paired file cannot be read.
    pub fn load_pairs(
        &self,
        ranked: &[RankedExample],
        limit: usize,
        code_ext: &str,
    ) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        for example in ranked.iter().take(limit) {
            let desc_path = self.library_dir.join(format!("{}.md", example.name));
            let code_path = self
                .library_dir
                .join(format!("{}.{code_ext}", example.name));
            let Ok(description) = std::fs::read_to_string(&desc_path) else {
                continue;
            };
            let Ok(code) = std::fs::read_to_string(&code_path) else {
                continue;
            };
            pairs.push((description, code));
        }
        Ok(pairs)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Absolute path to a library directory's cache file, exposed for tests and
/// tooling that want to inspect or clear the cache directly.
#[must_use]
pub fn cache_path(library_dir: &Path) -> PathBuf {
    library_dir.join("embeddings.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_library_ranks_to_empty() {
        let dir = std::env::temp_dir().join(format!("forge-empty-lib-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        let index = DescriptionIndex::new(&dir);
        assert!(index.rank(&[1.0, 0.0]).is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rank_orders_by_dot_product_descending() {
        let dir = std::env::temp_dir().join(format!("forge-lib-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        let index = DescriptionIndex::new(&dir);
        let cache = EmbeddingCache {
            entries: BTreeMap::from([
                ("low".to_string(), vec![0.1, 0.1]),
                ("high".to_string(), vec![1.0, 1.0]),
            ]),
        };
        index.save_cache(&cache).unwrap();
        let ranked = index.rank(&[1.0, 1.0]);
        assert_eq!(ranked[0].name, "high");
        assert_eq!(ranked[1].name, "low");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
