//! Web Search Strategy — answers questions the résumé cannot, from live
//! search results. Terminal: there is no further fallback beyond web search
//! in the graph, so a search failure degrades the turn rather than
//! re-routing.

use tracing::warn;

use crate::llm_client::CompletionBackend;
use crate::search::WebSearch;
use crate::workflow::prompts::{WEB_SYNTH_PROMPT_TEMPLATE, WEB_SYNTH_SYSTEM};
use crate::workflow::state::{DegradeReason, EvidenceDoc, GenerationResult, QuestionContext};

use crate::workflow::generation::{EMPTY_QUESTION_ANSWER, GENERATION_FAILED_ANSWER};

/// Fixed answer substituted when the search capability fails.
pub const WEB_SEARCH_FAILED_ANSWER: &str =
    "Unable to complete a web search for this question right now. Please try again.";

/// Searches the web for `ctx.question` and synthesizes a concise answer
/// from the result snippets. The snippets become the result's evidence,
/// tagged with web provenance.
pub async fn web_search_answer(
    web: &dyn WebSearch,
    backend: &dyn CompletionBackend,
    ctx: &QuestionContext,
) -> GenerationResult {
    if ctx.question_is_empty() {
        return GenerationResult::degraded(EMPTY_QUESTION_ANSWER, DegradeReason::EmptyQuestion);
    }

    let hits = match web.search(&ctx.question).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!("Web search capability failed: {e}");
            return GenerationResult::degraded(
                WEB_SEARCH_FAILED_ANSWER,
                DegradeReason::WebSearchFailed,
            );
        }
    };

    let web_results = hits
        .iter()
        .map(|h| h.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = WEB_SYNTH_PROMPT_TEMPLATE
        .replace("{question}", &ctx.question)
        .replace("{web_results}", &web_results);

    let evidence: Vec<EvidenceDoc> = hits
        .into_iter()
        .map(|h| {
            let mut doc = EvidenceDoc::web(h.content);
            if !h.title.is_empty() {
                doc.section = Some(h.title);
            }
            doc
        })
        .collect();

    match backend.complete(&prompt, WEB_SYNTH_SYSTEM).await {
        Ok(answer) => GenerationResult::grounded(answer, evidence),
        Err(e) => {
            warn!("Web synthesis backend failed: {e}");
            GenerationResult::degraded(GENERATION_FAILED_ANSWER, DegradeReason::GenerationFailed)
        }
    }
}
