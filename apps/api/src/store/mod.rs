#![allow(dead_code)]

//! Document store capability — similarity search over a résumé's passages.
//!
//! The workflow consumes this trait and never sees the indexing mechanics.
//! `MemoryStore` is the deterministic in-process backend (token overlap, no
//! model calls); a vector-index backend can be swapped in behind the same
//! trait. `ActiveIndex` holds the store a session currently reads from and
//! supports atomic replacement on rebuild.

pub mod active;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::workflow::state::EvidenceDoc;

pub use active::ActiveIndex;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Search failed: {0}")]
    Search(String),
}

/// A search hit: the passage plus its similarity score in [0, 1].
/// The score feeds the router's similarity heuristic.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: EvidenceDoc,
    pub score: f32,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the top-k passages most similar to `query`, best first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, StoreError>;
}
