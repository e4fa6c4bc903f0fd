use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;
use crate::session::SessionRegistry;
use crate::workflow::controller::Workflow;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend used outside the workflow (JD summarization).
    /// The workflow holds its own handle to the same backend.
    pub llm: Arc<dyn CompletionBackend>,
    /// The compiled answering workflow, shared by every session.
    pub workflow: Arc<Workflow>,
    pub sessions: SessionRegistry,
    pub config: Config,
}
