// The adaptive answering workflow: routing, multi-perspective retrieval,
// grounded generation, grading, and bounded re-routing on failure.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod controller;
pub mod expansion;
pub mod generation;
pub mod grading;
pub mod prompts;
pub mod retrieval;
pub mod routing;
pub mod state;
pub mod web_search;
