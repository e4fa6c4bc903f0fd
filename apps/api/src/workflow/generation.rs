//! Answer Generation — synthesizes an answer grounded strictly in the
//! evidence attached to the question context.
//!
//! Two short-circuits run before any model call: an empty question and an
//! empty evidence set both produce fixed warning answers — the model is
//! never allowed to free-associate when there is nothing retrieved.
//! Backend failures are caught here; the workflow has no recovery path
//! above this node other than ending the turn gracefully.

use tracing::warn;

use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::CompletionBackend;
use crate::models::chat::format_history;
use crate::workflow::prompts::{
    FALLBACK_PROMPT_TEMPLATE, FALLBACK_SYSTEM, RAG_PROMPT_TEMPLATE, RAG_SYSTEM,
};
use crate::workflow::state::{DegradeReason, GenerationResult, QuestionContext};

/// Fixed answer for an empty question. No model call is made.
pub const EMPTY_QUESTION_ANSWER: &str =
    "No question was provided. Please enter a question to get started.";

/// Fixed answer when retrieval produced no evidence. No model call is made.
pub const NO_EVIDENCE_ANSWER: &str = "The provided information is insufficient to answer this \
    question — no matching resume content was found.";

/// Fixed answer substituted when the generation backend fails.
pub const GENERATION_FAILED_ANSWER: &str =
    "Unable to generate a response right now. Please try again.";

/// Generates an answer from the evidence on `ctx`.
///
/// The returned result carries the exact evidence snapshot the model was
/// conditioned on. This function never returns an error: every failure mode
/// maps to a fixed degraded answer.
pub async fn generate_answer(
    backend: &dyn CompletionBackend,
    ctx: &QuestionContext,
) -> GenerationResult {
    if ctx.question_is_empty() {
        return GenerationResult::degraded(EMPTY_QUESTION_ANSWER, DegradeReason::EmptyQuestion);
    }

    if ctx.documents.is_empty() {
        return GenerationResult::degraded(NO_EVIDENCE_ANSWER, DegradeReason::NoEvidence);
    }

    let context_block = ctx
        .documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = RAG_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{context}", &context_block)
        .replace(
            "{job_description}",
            ctx.job_description.as_deref().unwrap_or(""),
        )
        .replace("{conversation_history}", &format_history(&ctx.history))
        .replace("{question}", &ctx.question);

    match backend.complete(&prompt, RAG_SYSTEM).await {
        Ok(answer) => GenerationResult::grounded(answer, ctx.documents.clone()),
        Err(e) => {
            warn!("Generation backend failed: {e}");
            let mut result =
                GenerationResult::degraded(GENERATION_FAILED_ANSWER, DegradeReason::GenerationFailed);
            // Keep the snapshot: the evidence was visible at invocation time.
            result.evidence = ctx.documents.clone();
            result
        }
    }
}

/// Conversational fallback for `LlmFallback` routes — greetings, small talk,
/// brief general career guidance. Uses conversation history for continuity
/// only; never resume evidence.
pub async fn generate_fallback(
    backend: &dyn CompletionBackend,
    ctx: &QuestionContext,
) -> GenerationResult {
    if ctx.question_is_empty() {
        return GenerationResult::degraded(EMPTY_QUESTION_ANSWER, DegradeReason::EmptyQuestion);
    }

    let prompt = FALLBACK_PROMPT_TEMPLATE
        .replace("{conversation_history}", &format_history(&ctx.history))
        .replace("{question}", &ctx.question);

    match backend.complete(&prompt, FALLBACK_SYSTEM).await {
        Ok(answer) => GenerationResult::grounded(answer, Vec::new()),
        Err(e) => {
            warn!("Fallback generation backend failed: {e}");
            GenerationResult::degraded(GENERATION_FAILED_ANSWER, DegradeReason::GenerationFailed)
        }
    }
}
