//! Atomically-swappable active index.
//!
//! Rebuilding a résumé's index must never mutate a store that in-flight
//! turns may be reading. Each rebuild installs a new, uniquely-identified
//! store and swaps the active reference; readers that already resolved a
//! generation keep it until they finish.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::DocumentStore;

struct Generation {
    id: Uuid,
    store: Arc<dyn DocumentStore>,
}

pub struct ActiveIndex {
    current: RwLock<Generation>,
}

impl ActiveIndex {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            current: RwLock::new(Generation {
                id: Uuid::new_v4(),
                store,
            }),
        }
    }

    /// Resolves the store to read from. The returned handle stays valid
    /// across a concurrent swap.
    pub async fn resolve(&self) -> Arc<dyn DocumentStore> {
        self.current.read().await.store.clone()
    }

    pub async fn generation(&self) -> Uuid {
        self.current.read().await.id
    }

    /// Installs a freshly built store as the active generation and returns
    /// its id. Readers holding the previous generation are unaffected.
    pub async fn swap(&self, store: Arc<dyn DocumentStore>) -> Uuid {
        let id = Uuid::new_v4();
        let mut current = self.current.write().await;
        *current = Generation { id, store };
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::workflow::state::EvidenceDoc;

    #[tokio::test]
    async fn test_swap_changes_generation_id() {
        let index = ActiveIndex::new(Arc::new(MemoryStore::default()));
        let before = index.generation().await;
        index.swap(Arc::new(MemoryStore::default())).await;
        let after = index.generation().await;
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_resolved_handle_survives_swap() {
        let index = ActiveIndex::new(Arc::new(MemoryStore::new(vec![EvidenceDoc::resume(
            "Original entry about Rust experience",
        )])));

        let held = index.resolve().await;
        index.swap(Arc::new(MemoryStore::default())).await;

        // The held generation still serves the old content.
        let hits = held.search("rust experience", 3).await.unwrap();
        assert_eq!(hits.len(), 1);

        // A fresh resolve sees the new, empty generation.
        let fresh = index.resolve().await;
        let hits = fresh.search("rust experience", 3).await.unwrap();
        assert!(hits.is_empty());
    }
}
