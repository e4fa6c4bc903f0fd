//! Workflow state — the unit of work flowing through the answering graph,
//! plus the closed enumerations every conditional edge switches on.
//!
//! Route decisions and grade verdicts are tagged unions, not strings: an
//! unmapped label cannot exist at the type level, so the controller's
//! transition table is total by construction.

use serde::{Deserialize, Serialize};

use crate::models::chat::ChatMessage;

// ────────────────────────────────────────────────────────────────────────────
// Evidence
// ────────────────────────────────────────────────────────────────────────────

/// Where a retrieved passage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Resume,
    Web,
}

/// A retrieved passage used to ground an answer.
///
/// Identity for deduplication is the trimmed content text: two documents with
/// identical text are the same evidence item regardless of which expanded
/// query produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceDoc {
    pub content: String,
    /// Origin section or category within the source résumé, when known.
    pub section: Option<String>,
    pub provenance: Provenance,
}

impl EvidenceDoc {
    pub fn resume(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            section: None,
            provenance: Provenance::Resume,
        }
    }

    pub fn web(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            section: None,
            provenance: Provenance::Web,
        }
    }

    /// Dedup key — trimmed content text.
    pub fn dedup_key(&self) -> &str {
        self.content.trim()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Closed enumerations
// ────────────────────────────────────────────────────────────────────────────

/// The Router's choice of answering strategy for a question.
/// Produced exactly once per question; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    Retrieve,
    WebSearch,
    LlmFallback,
}

/// The Grader's classification of a generated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeVerdict {
    Useful,
    NotUseful,
    /// The answer addresses the question but makes claims absent from the
    /// evidence it was generated against.
    NotSupported,
}

/// Structured reason attached to a degraded terminal answer.
///
/// Nodes report failure through these tags so the controller decides on
/// typed information, never by matching error-message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeReason {
    EmptyQuestion,
    NoEvidence,
    GenerationFailed,
    RetriesExhausted,
    GradeParseFailed,
    WebSearchFailed,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation result
// ────────────────────────────────────────────────────────────────────────────

/// An answer plus the exact evidence set it was conditioned on.
///
/// The evidence snapshot is taken at generator invocation time and never
/// retroactively altered — the grader checks grounding against it without
/// re-fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub answer: String,
    pub evidence: Vec<EvidenceDoc>,
    pub degraded: Option<DegradeReason>,
}

impl GenerationResult {
    pub fn grounded(answer: impl Into<String>, evidence: Vec<EvidenceDoc>) -> Self {
        Self {
            answer: answer.into(),
            evidence,
            degraded: None,
        }
    }

    pub fn degraded(answer: impl Into<String>, reason: DegradeReason) -> Self {
        Self {
            answer: answer.into(),
            evidence: Vec::new(),
            degraded: Some(reason),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Question context
// ────────────────────────────────────────────────────────────────────────────

/// The unit of work for one user turn.
///
/// Created fresh per turn, enriched in place as it moves through the graph
/// (documents and generation are added, never removed), discarded when the
/// turn completes. Conversation history is carried forward by the session,
/// not by this object.
#[derive(Debug, Clone, Default)]
pub struct QuestionContext {
    pub question: String,
    pub job_description: Option<String>,
    pub resume_summary: Option<String>,
    pub history: Vec<ChatMessage>,
    pub documents: Vec<EvidenceDoc>,
    pub generation: Option<GenerationResult>,
}

impl QuestionContext {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_job_description(mut self, jd: impl Into<String>) -> Self {
        self.job_description = Some(jd.into());
        self
    }

    pub fn with_resume_summary(mut self, summary: impl Into<String>) -> Self {
        self.resume_summary = Some(summary.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    /// True when the question is empty after trimming — the degenerate turn
    /// that short-circuits the whole graph.
    pub fn question_is_empty(&self) -> bool {
        self.question.trim().is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Turn outcome
// ────────────────────────────────────────────────────────────────────────────

/// What a completed turn hands back to the caller.
///
/// Every terminal state of the workflow produces answer text; degraded paths
/// carry their reason so callers can surface reduced confidence.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub answer: String,
    /// `None` only for the empty-question short-circuit, which terminates
    /// before the router runs.
    pub route: Option<RouteDecision>,
    /// The grader's final verdict, when generation was graded on this turn.
    pub verdict: Option<GradeVerdict>,
    pub degraded: Option<DegradeReason>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_decision_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RouteDecision::WebSearch).unwrap(),
            r#""web_search""#
        );
        assert_eq!(
            serde_json::to_string(&RouteDecision::LlmFallback).unwrap(),
            r#""llm_fallback""#
        );
    }

    #[test]
    fn test_grade_verdict_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&GradeVerdict::NotSupported).unwrap(),
            r#""not_supported""#
        );
    }

    #[test]
    fn test_evidence_dedup_key_trims_content() {
        let doc = EvidenceDoc::resume("  Led migration to Rust services.  \n");
        assert_eq!(doc.dedup_key(), "Led migration to Rust services.");
    }

    #[test]
    fn test_question_is_empty_after_trim() {
        assert!(QuestionContext::new("   \n\t ").question_is_empty());
        assert!(!QuestionContext::new("What are my skills?").question_is_empty());
    }

    #[test]
    fn test_generation_result_degraded_carries_no_evidence() {
        let result = GenerationResult::degraded("warning", DegradeReason::NoEvidence);
        assert!(result.evidence.is_empty());
        assert_eq!(result.degraded, Some(DegradeReason::NoEvidence));
    }
}
