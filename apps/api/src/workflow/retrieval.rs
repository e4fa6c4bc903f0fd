//! Evidence Retrieval — multi-perspective search against the document store.
//!
//! Recall over precision: every query variant contributes its top-k hits,
//! duplicates are removed by content text, and no cross-variant re-ranking
//! happens — the grader downstream catches false positives. Retrieval never
//! propagates an error into the workflow: a dead store yields an empty
//! evidence set and the generator's insufficient-context path takes over.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::llm_client::CompletionBackend;
use crate::store::DocumentStore;
use crate::workflow::expansion::expand_query;
use crate::workflow::state::EvidenceDoc;

/// Retrieves deduplicated evidence for `question`.
///
/// The question is expanded into `num_variations` rephrasings; the original
/// question is always searched first. Per-variant searches run as one
/// concurrent batch, but merging follows variant order — never arrival
/// order — so the result is deterministic for a given store state.
///
/// Expansion failure does not abort retrieval: the retriever falls back to
/// the original question only. This is the one sanctioned degradation of
/// expansion (the expander itself always propagates its errors).
pub async fn retrieve_evidence(
    store: &dyn DocumentStore,
    backend: &dyn CompletionBackend,
    question: &str,
    k: usize,
    num_variations: usize,
) -> Vec<EvidenceDoc> {
    let mut queries = vec![question.to_string()];
    match expand_query(backend, question, num_variations).await {
        Ok(variations) => queries.extend(variations),
        Err(e) => {
            warn!("Query expansion failed, retrieving with original question only: {e}");
        }
    }

    let searches = queries.iter().map(|q| store.search(q, k));
    let results = join_all(searches).await;

    let mut merged = Vec::new();
    for (query, result) in queries.iter().zip(results) {
        match result {
            Ok(hits) => merged.extend(hits.into_iter().map(|h| h.document)),
            Err(e) => {
                // Fail open per variant: a degraded store must not kill a
                // live conversation.
                warn!("Store search failed for variant {query:?}: {e}");
            }
        }
    }

    let deduped = dedup_by_content(merged);
    debug!(
        "Retrieved {} unique documents across {} query variants",
        deduped.len(),
        queries.len()
    );
    deduped
}

/// Removes duplicate documents by trimmed content text, preserving
/// first-seen order.
fn dedup_by_content(documents: Vec<EvidenceDoc>) -> Vec<EvidenceDoc> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| seen.insert(doc.dedup_key().to_string()))
        .collect()
}
