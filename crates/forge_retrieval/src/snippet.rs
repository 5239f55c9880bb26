//! Code-snippet retrieval: chunk files into nodes, rank by dense similarity.
//!
//! The original system AST-splits source files with a tree-sitter-backed
//! indexer. No such crate appears anywhere in this workspace's dependency
//! graph, so nodes here are fixed-size line windows — coarser, but the same
//! index/query/format contract.

use serde::{Deserialize, Serialize};

const CHUNK_LINES: usize = 24;

/// One indexed code chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetNode {
    /// Source file this chunk came from.
    pub path: String,
    /// Chunk text.
    pub content: String,
    /// Dense embedding of `content`.
    pub embedding: Vec<f32>,
}

/// A scored retrieval hit.
#[derive(Debug, Clone)]
pub struct ScoredSnippet<'a> {
    /// The matched node.
    pub node: &'a SnippetNode,
    /// Similarity score.
    pub score: f32,
}

/// An in-memory vector store over code snippet nodes.
#[derive(Debug, Default)]
pub struct SnippetIndex {
    nodes: Vec<SnippetNode>,
}

impl SnippetIndex {
    /// Builds an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `content` into fixed-size line windows and appends them,
    /// embedding is attached by the caller via `push_node` since chunking
    /// itself doesn't need the oracle.
    #[must_use]
    pub fn chunk(path: &str, content: &str) -> Vec<(String, String)> {
        content
            .lines()
            .collect::<Vec<_>>()
            .chunks(CHUNK_LINES)
            .map(|lines| (path.to_string(), lines.join("\n")))
            .collect()
    }

    /// Adds an embedded node to the index.
    pub fn push_node(&mut self, node: SnippetNode) {
        self.nodes.push(node);
    }

    /// Returns true if the index holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the top-K nodes by dot-product similarity to `query_embedding`.
    /// Empty index yields an empty result.
    #[must_use]
    pub fn retrieve(&self, query_embedding: &[f32], top_k: usize) -> Vec<ScoredSnippet<'_>> {
        let mut scored: Vec<ScoredSnippet<'_>> = self
            .nodes
            .iter()
            .map(|node| ScoredSnippet {
                node,
                score: dot(query_embedding, &node.embedding),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        scored
    }

    /// Formats retrieval hits the way a prompt-builder would embed them:
    /// one `Document N, score: S` block per hit.
    #[must_use]
    pub fn retrieve_as_string(&self, query_embedding: &[f32], top_k: usize) -> String {
        self.retrieve(query_embedding, top_k)
            .into_iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "Document {}, score: {:.4}\n{}\n",
                    i + 1,
                    hit.score,
                    hit.node.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_splits_by_fixed_line_window() {
        let content: String = (0..50)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = SnippetIndex::chunk("a.rs", &content);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].1.starts_with("line 0"));
    }

    #[test]
    fn retrieve_on_empty_index_is_empty() {
        let index = SnippetIndex::new();
        assert!(index.retrieve(&[1.0], 5).is_empty());
    }

    #[test]
    fn retrieve_ranks_by_similarity() {
        let mut index = SnippetIndex::new();
        index.push_node(SnippetNode {
            path: "a.rs".to_string(),
            content: "fn low() {}".to_string(),
            embedding: vec![0.0, 1.0],
        });
        index.push_node(SnippetNode {
            path: "b.rs".to_string(),
            content: "fn high() {}".to_string(),
            embedding: vec![1.0, 0.0],
        });
        let hits = index.retrieve(&[1.0, 0.0], 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node.path, "b.rs");
    }
}
