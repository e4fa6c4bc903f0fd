//! In-memory document store scoring by normalized token overlap.
//!
//! Deterministic and dependency-free: the default backend until a vector
//! index is attached behind the same trait. Scores are the fraction of
//! distinct query tokens present in a passage, so they land in [0, 1] and
//! compare meaningfully against the router's similarity threshold.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::store::{DocumentStore, ScoredDocument, StoreError};
use crate::workflow::state::EvidenceDoc;

pub struct MemoryStore {
    documents: Vec<IndexedDoc>,
}

struct IndexedDoc {
    document: EvidenceDoc,
    tokens: HashSet<String>,
}

impl MemoryStore {
    pub fn new(documents: Vec<EvidenceDoc>) -> Self {
        let documents = documents
            .into_iter()
            .map(|document| IndexedDoc {
                tokens: tokenize(&document.content),
                document,
            })
            .collect();
        Self { documents }
    }

}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, StoreError> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<ScoredDocument> = self
            .documents
            .iter()
            .filter_map(|doc| {
                let overlap = doc.tokens.intersection(&query_tokens).count();
                if overlap == 0 {
                    return None;
                }
                let score = overlap as f32 / query_tokens.len() as f32;
                Some(ScoredDocument {
                    document: doc.document.clone(),
                    score,
                })
            })
            .collect();

        // Stable sort keeps insertion order among equal scores, so results
        // are reproducible across identical calls.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }
}

/// Lowercased alphanumeric tokens, single characters dropped.
fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(|t| t.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(contents: &[&str]) -> MemoryStore {
        MemoryStore::new(contents.iter().map(|c| EvidenceDoc::resume(*c)).collect())
    }

    #[tokio::test]
    async fn test_search_ranks_by_overlap() {
        let store = store_with(&[
            "Built distributed systems in Rust at Acme",
            "Taught yoga classes on weekends",
        ]);
        let hits = store.search("rust distributed systems", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].document.content.contains("Acme"));
        assert!((hits[0].score - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_search_respects_k() {
        let store = store_with(&[
            "Rust project one",
            "Rust project two",
            "Rust project three",
        ]);
        let hits = store.search("rust project", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_search_empty_query_returns_nothing() {
        let store = store_with(&["Some experience entry"]);
        let hits = store.search("  ", 3).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_scores_bounded_zero_one() {
        let store = store_with(&["Led migration of billing services to Rust"]);
        let hits = store
            .search("rust billing kubernetes terraform", 3)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].score > 0.0 && hits[0].score <= 1.0);
    }

    #[tokio::test]
    async fn test_empty_store_returns_no_hits() {
        let store = MemoryStore::default();
        let hits = store.search("anything", 3).await.unwrap();
        assert!(hits.is_empty());
    }
}
