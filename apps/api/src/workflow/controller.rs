//! Workflow Controller — the state machine wiring routing, retrieval,
//! generation, grading, and web search into one answering flow.
//!
//! The graph is an explicit transition table over a closed node set:
//!
//! ```text
//! Start ──route──▶ Retrieve ──▶ Generate ──useful──────▶ End
//!   │                              │   ▲
//!   │                              │   └─not supported (capped)
//!   │                              └─not useful──▶ WebSearch ──▶ End
//!   ├──────────────────────────────────────────▶ WebSearch ──▶ End
//!   └──────────────────────────────────────────▶ LlmFallback ─▶ End
//! ```
//!
//! Every node that makes external calls runs under a boundary timeout; a
//! timeout takes that node's designated failure path, never a crash. Every
//! terminal state produces answer text.

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::WorkflowConfig;
use crate::llm_client::CompletionBackend;
use crate::search::WebSearch;
use crate::store::DocumentStore;
use crate::workflow::generation::{
    generate_answer, generate_fallback, EMPTY_QUESTION_ANSWER, GENERATION_FAILED_ANSWER,
};
use crate::workflow::grading::grade_generation;
use crate::workflow::retrieval::retrieve_evidence;
use crate::workflow::routing::{route_question, RoutingConfig};
use crate::workflow::state::{
    DegradeReason, GenerationResult, GradeVerdict, QuestionContext, RouteDecision, TurnOutcome,
};
use crate::workflow::web_search::{web_search_answer, WEB_SEARCH_FAILED_ANSWER};

/// Workflow nodes. `End` is the only terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Start,
    Retrieve,
    Generate,
    WebSearch,
    LlmFallback,
    End,
}

/// The compiled answering workflow: capability handles plus tunables.
/// One instance serves all sessions; per-turn state lives in the
/// `QuestionContext`.
pub struct Workflow {
    backend: Arc<dyn CompletionBackend>,
    web: Arc<dyn WebSearch>,
    config: WorkflowConfig,
}

impl Workflow {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        web: Arc<dyn WebSearch>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            backend,
            web,
            config,
        }
    }

    /// Runs one question through the graph to completion.
    ///
    /// `store` is the index generation resolved for this turn — a
    /// concurrent rebuild swap does not affect a turn already in flight.
    pub async fn run(&self, store: Arc<dyn DocumentStore>, mut ctx: QuestionContext) -> TurnOutcome {
        // Degenerate turn: terminate before the router so no capability is
        // ever invoked for an empty question.
        if ctx.question_is_empty() {
            return TurnOutcome {
                answer: EMPTY_QUESTION_ANSWER.to_string(),
                route: None,
                verdict: None,
                degraded: Some(DegradeReason::EmptyQuestion),
            };
        }

        let t = self.config.node_timeout;
        let routing_config = RoutingConfig {
            similarity_threshold: self.config.similarity_threshold,
            heuristic_k: self.config.retrieval_k,
        };

        let mut node = Node::Start;
        let mut route: Option<RouteDecision> = None;
        let mut verdict: Option<GradeVerdict> = None;
        let mut regenerations: u32 = 0;

        loop {
            node = match node {
                Node::Start => {
                    let decision = match timeout(
                        t,
                        route_question(store.as_ref(), self.backend.as_ref(), &ctx, routing_config),
                    )
                    .await
                    {
                        Ok(decision) => decision,
                        Err(_) => {
                            warn!("Routing timed out, defaulting to fallback");
                            RouteDecision::LlmFallback
                        }
                    };
                    info!("Route decision: {decision:?}");
                    route = Some(decision);
                    match decision {
                        RouteDecision::Retrieve => Node::Retrieve,
                        RouteDecision::WebSearch => Node::WebSearch,
                        RouteDecision::LlmFallback => Node::LlmFallback,
                    }
                }

                Node::Retrieve => {
                    let evidence = match timeout(
                        t,
                        retrieve_evidence(
                            store.as_ref(),
                            self.backend.as_ref(),
                            &ctx.question,
                            self.config.retrieval_k,
                            self.config.expansion_variations,
                        ),
                    )
                    .await
                    {
                        Ok(evidence) => evidence,
                        Err(_) => {
                            // Retrieval's failure path is the empty evidence
                            // set; the generator's short-circuit answers.
                            warn!("Retrieval timed out");
                            Vec::new()
                        }
                    };
                    ctx.documents.extend(evidence);
                    Node::Generate
                }

                Node::Generate => {
                    let result = match timeout(t, generate_answer(self.backend.as_ref(), &ctx))
                        .await
                    {
                        Ok(result) => result,
                        Err(_) => {
                            warn!("Generation timed out");
                            GenerationResult::degraded(
                                GENERATION_FAILED_ANSWER,
                                DegradeReason::GenerationFailed,
                            )
                        }
                    };

                    if result.degraded.is_some() {
                        // Canned warning answers terminate the turn; grading
                        // text the node already flagged would only spend a
                        // model call to learn what we know.
                        ctx.generation = Some(result);
                        Node::End
                    } else {
                        let graded = match timeout(
                            t,
                            grade_generation(self.backend.as_ref(), &ctx.question, &result),
                        )
                        .await
                        {
                            Ok(Ok(v)) => v,
                            Ok(Err(e)) => {
                                // Forced verdict: a grade we could not parse
                                // must re-route, never pass as success.
                                warn!("Grading failed, forcing not-useful: {e}");
                                GradeVerdict::NotUseful
                            }
                            Err(_) => {
                                warn!("Grading timed out, forcing not-useful");
                                GradeVerdict::NotUseful
                            }
                        };
                        verdict = Some(graded);
                        ctx.generation = Some(result);

                        match graded {
                            GradeVerdict::Useful => Node::End,
                            GradeVerdict::NotUseful => Node::WebSearch,
                            GradeVerdict::NotSupported => {
                                if regenerations >= self.config.max_regenerations {
                                    warn!(
                                        "Regeneration cap ({}) reached, terminating with reduced confidence",
                                        self.config.max_regenerations
                                    );
                                    if let Some(generation) = ctx.generation.as_mut() {
                                        generation.degraded =
                                            Some(DegradeReason::RetriesExhausted);
                                    }
                                    Node::End
                                } else {
                                    regenerations += 1;
                                    info!(
                                        "Answer not supported by evidence, regenerating ({}/{})",
                                        regenerations, self.config.max_regenerations
                                    );
                                    Node::Generate
                                }
                            }
                        }
                    }
                }

                Node::WebSearch => {
                    let result = match timeout(
                        t,
                        web_search_answer(self.web.as_ref(), self.backend.as_ref(), &ctx),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => {
                            warn!("Web search timed out");
                            GenerationResult::degraded(
                                WEB_SEARCH_FAILED_ANSWER,
                                DegradeReason::WebSearchFailed,
                            )
                        }
                    };
                    ctx.generation = Some(result);
                    Node::End
                }

                Node::LlmFallback => {
                    let result = match timeout(t, generate_fallback(self.backend.as_ref(), &ctx))
                        .await
                    {
                        Ok(result) => result,
                        Err(_) => {
                            warn!("Fallback generation timed out");
                            GenerationResult::degraded(
                                GENERATION_FAILED_ANSWER,
                                DegradeReason::GenerationFailed,
                            )
                        }
                    };
                    ctx.generation = Some(result);
                    Node::End
                }

                Node::End => break,
            };
        }

        let generation = ctx.generation.take().unwrap_or_else(|| {
            // Unreachable through the table above; keep the always-answer
            // guarantee anyway.
            GenerationResult::degraded(GENERATION_FAILED_ANSWER, DegradeReason::GenerationFailed)
        });

        TurnOutcome {
            answer: generation.answer,
            route,
            verdict,
            degraded: generation.degraded,
        }
    }
}
