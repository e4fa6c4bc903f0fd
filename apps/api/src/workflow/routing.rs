//! Routing — picks the answering strategy for a question.
//!
//! Three layers, first match wins: a keyword shortcut (cheap, high
//! precision, no model call), a fail-open embedding-similarity heuristic,
//! and a classifier fallback. Unmapped classifier output and classifier
//! errors both land on `LlmFallback`: when unsure, talk — don't hallucinate
//! retrieval.

use tracing::{debug, warn};

use crate::llm_client::CompletionBackend;
use crate::models::chat::format_history;
use crate::store::DocumentStore;
use crate::workflow::prompts::{ROUTING_PROMPT_TEMPLATE, ROUTING_SYSTEM};
use crate::workflow::state::{QuestionContext, RouteDecision};

/// Role/compensation/logistics keywords that, with a JD attached, make
/// retrieval a near-certain win without a model call.
const JD_KEYWORDS: [&str; 5] = ["company", "role", "position", "salary", "location"];

#[derive(Debug, Clone, Copy)]
pub struct RoutingConfig {
    /// Minimum similarity score for the heuristic to fire.
    pub similarity_threshold: f32,
    /// Hits fetched for the similarity heuristic.
    pub heuristic_k: usize,
}

/// Decides how to resolve `ctx.question`. Pure given its inputs and the
/// store state at call time; mutates nothing.
pub async fn route_question(
    store: &dyn DocumentStore,
    backend: &dyn CompletionBackend,
    ctx: &QuestionContext,
    config: RoutingConfig,
) -> RouteDecision {
    let question_lower = ctx.question.to_lowercase();

    // Layer 1: keyword shortcut — only meaningful when a JD is attached.
    let has_jd = ctx
        .job_description
        .as_deref()
        .is_some_and(|jd| !jd.trim().is_empty());
    if has_jd && JD_KEYWORDS.iter().any(|kw| question_lower.contains(kw)) {
        debug!("Route: keyword shortcut fired");
        return RouteDecision::Retrieve;
    }

    // Layer 2: similarity heuristic. Fails open — any store error counts
    // as "did not fire", never as a workflow failure.
    match store.search(&ctx.question, config.heuristic_k).await {
        Ok(hits) => {
            if hits.iter().any(|h| h.score >= config.similarity_threshold) {
                debug!("Route: similarity heuristic fired");
                return RouteDecision::Retrieve;
            }
        }
        Err(e) => {
            debug!("Similarity heuristic unavailable, skipping: {e}");
        }
    }

    // Layer 3: classifier fallback.
    classify(backend, ctx).await
}

async fn classify(backend: &dyn CompletionBackend, ctx: &QuestionContext) -> RouteDecision {
    let prompt = ROUTING_PROMPT_TEMPLATE
        .replace("{resume_summary}", ctx.resume_summary.as_deref().unwrap_or(""))
        .replace(
            "{jd_summary}",
            ctx.job_description.as_deref().unwrap_or(""),
        )
        .replace("{conversation_history}", &format_history(&ctx.history))
        .replace("{question}", &ctx.question);

    let output = match backend.complete(&prompt, ROUTING_SYSTEM).await {
        Ok(output) => output,
        Err(e) => {
            warn!("Routing classifier failed, defaulting to fallback: {e}");
            return RouteDecision::LlmFallback;
        }
    };

    match output.trim().to_uppercase().as_str() {
        "VECTORSTORE" => RouteDecision::Retrieve,
        "WEBSEARCH" => RouteDecision::WebSearch,
        "LLM" => RouteDecision::LlmFallback,
        other => {
            warn!("Routing classifier returned unmapped label {other:?}, defaulting to fallback");
            RouteDecision::LlmFallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::store::{MemoryStore, ScoredDocument, StoreError};
    use crate::workflow::state::EvidenceDoc;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CONFIG: RoutingConfig = RoutingConfig {
        similarity_threshold: 0.70,
        heuristic_k: 3,
    };

    struct CannedBackend(&'static str);

    #[async_trait]
    impl CompletionBackend for CannedBackend {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct CountingBackend {
        calls: AtomicUsize,
        reply: &'static str,
    }

    #[async_trait]
    impl CompletionBackend for CountingBackend {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl CompletionBackend for FailingBackend {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn search(&self, _query: &str, _k: usize) -> Result<Vec<ScoredDocument>, StoreError> {
            Err(StoreError::Unavailable("embedding service down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_keyword_shortcut_bypasses_classifier() {
        // Classifier says WEBSEARCH, but "salary" + a JD must short-circuit
        // to Retrieve without any model call.
        let backend = CountingBackend {
            calls: AtomicUsize::new(0),
            reply: "WEBSEARCH",
        };
        let ctx = QuestionContext::new("What salary should I expect?")
            .with_job_description("Senior Rust engineer role at Acme");
        let route = route_question(&MemoryStore::default(), &backend, &ctx, CONFIG).await;
        assert_eq!(route, RouteDecision::Retrieve);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_keyword_shortcut_requires_jd() {
        let backend = CannedBackend("LLM");
        let ctx = QuestionContext::new("What salary should I expect?");
        let route = route_question(&MemoryStore::default(), &backend, &ctx, CONFIG).await;
        assert_eq!(route, RouteDecision::LlmFallback);
    }

    #[tokio::test]
    async fn test_similarity_heuristic_fires_above_threshold() {
        let store = MemoryStore::new(vec![EvidenceDoc::resume(
            "Built distributed Rust services at Acme",
        )]);
        // All query tokens overlap → score 1.0 ≥ 0.70. Classifier says LLM
        // but must never be reached.
        let backend = CannedBackend("LLM");
        let ctx = QuestionContext::new("distributed rust services");
        let route = route_question(&store, &backend, &ctx, CONFIG).await;
        assert_eq!(route, RouteDecision::Retrieve);
    }

    #[tokio::test]
    async fn test_broken_store_fails_open_to_classifier() {
        let backend = CannedBackend("WEBSEARCH");
        let ctx = QuestionContext::new("What are the current AI hiring trends in 2025?");
        let route = route_question(&BrokenStore, &backend, &ctx, CONFIG).await;
        assert_eq!(route, RouteDecision::WebSearch);
    }

    #[tokio::test]
    async fn test_classifier_labels_map_to_decisions() {
        let ctx = QuestionContext::new("ambiguous question with no overlap");
        for (label, expected) in [
            ("VECTORSTORE", RouteDecision::Retrieve),
            ("websearch", RouteDecision::WebSearch),
            (" llm \n", RouteDecision::LlmFallback),
        ] {
            let route =
                route_question(&MemoryStore::default(), &CannedBackend(label), &ctx, CONFIG).await;
            assert_eq!(route, expected, "label {label:?}");
        }
    }

    #[tokio::test]
    async fn test_unmapped_classifier_output_defaults_to_fallback() {
        let ctx = QuestionContext::new("something entirely unclear");
        let route = route_question(
            &MemoryStore::default(),
            &CannedBackend("RETRIEVE PLEASE"),
            &ctx,
            CONFIG,
        )
        .await;
        assert_eq!(route, RouteDecision::LlmFallback);
    }

    #[tokio::test]
    async fn test_classifier_error_defaults_to_fallback() {
        let ctx = QuestionContext::new("something entirely unclear");
        let route = route_question(&MemoryStore::default(), &FailingBackend, &ctx, CONFIG).await;
        assert_eq!(route, RouteDecision::LlmFallback);
    }
}
