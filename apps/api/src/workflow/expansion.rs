//! Query Expansion — turns one question into several rephrasings to widen
//! retrieval recall.
//!
//! The backend is asked for a numbered list; lines are parsed leniently
//! (malformed lines are kept verbatim, empty lines dropped) but a backend
//! failure always propagates — the caller decides whether retrieval may
//! proceed on the original question alone.

use tracing::debug;

use crate::llm_client::{CompletionBackend, LlmError};
use crate::workflow::prompts::{EXPAND_PROMPT_TEMPLATE, EXPAND_SYSTEM};

/// Expands `question` into at most `num_variations` alternative phrasings.
///
/// `num_variations` must be ≥ 1 and the question non-empty; both are caller
/// contracts enforced upstream by the retriever.
pub async fn expand_query(
    backend: &dyn CompletionBackend,
    question: &str,
    num_variations: usize,
) -> Result<Vec<String>, LlmError> {
    let prompt = EXPAND_PROMPT_TEMPLATE
        .replace("{num_variations}", &num_variations.to_string())
        .replace("{question}", question);

    let response = backend.complete(&prompt, EXPAND_SYSTEM).await?;
    let variations = parse_numbered_list(&response, num_variations);
    debug!(
        "Expanded query into {} variations (requested {})",
        variations.len(),
        num_variations
    );
    Ok(variations)
}

/// Parses an enumerated list, stripping "N. " style prefixes per line.
/// Lines that fail to split cleanly are kept verbatim; empty lines are
/// silently dropped. At most `limit` entries are returned.
fn parse_numbered_list(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(". ") {
            Some((prefix, rest)) if prefix.chars().all(|c| c.is_ascii_digit()) => {
                rest.trim().to_string()
            }
            _ => line.to_string(),
        })
        .filter(|line| !line.is_empty())
        .take(limit)
        .collect()
}
