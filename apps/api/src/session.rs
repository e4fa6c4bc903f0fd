//! Session Record — the per-user handle bundling the active document index,
//! routing signals (résumé summary, job-description summary), and the
//! conversation history carried across turns.
//!
//! Turn execution locks the session for its whole duration: two in-flight
//! turns can never mutate one session concurrently. The workflow itself
//! stays stateless — everything per-turn travels in the `QuestionContext`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::llm_client::{CompletionBackend, LlmError};
use crate::models::chat::ChatMessage;
use crate::store::{ActiveIndex, DocumentStore, MemoryStore};
use crate::workflow::controller::Workflow;
use crate::workflow::prompts::{SUMMARIZE_JD_PROMPT_TEMPLATE, SUMMARIZE_JD_SYSTEM};
use crate::workflow::state::{EvidenceDoc, QuestionContext, TurnOutcome};

struct SessionState {
    job_description: Option<String>,
    resume_summary: Option<String>,
    history: Vec<ChatMessage>,
}

pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    index: Arc<ActiveIndex>,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            index: Arc::new(ActiveIndex::new(store)),
            state: Mutex::new(SessionState {
                job_description: None,
                resume_summary: None,
                history: Vec::new(),
            }),
        }
    }

    /// Runs one question through the workflow against this session's state.
    ///
    /// The session lock is held for the full turn; the index generation is
    /// resolved once at the start, so a concurrent rebuild never affects
    /// this turn's reads. History is appended only after the turn completes.
    pub async fn run_turn(
        &self,
        workflow: &Workflow,
        question: &str,
        history_window: usize,
    ) -> TurnOutcome {
        let mut state = self.state.lock().await;
        let store = self.index.resolve().await;

        let recent = recent_suffix(&state.history, history_window);
        let mut ctx = QuestionContext::new(question).with_history(recent);
        if let Some(jd) = &state.job_description {
            ctx = ctx.with_job_description(jd.clone());
        }
        if let Some(summary) = &state.resume_summary {
            ctx = ctx.with_resume_summary(summary.clone());
        }

        let outcome = workflow.run(store, ctx).await;

        state.history.push(ChatMessage::user(question));
        state.history.push(ChatMessage::assistant(outcome.answer.clone()));

        outcome
    }

    /// Replaces the session's document index with a freshly built store.
    /// Returns the new index generation id.
    pub async fn replace_documents(&self, documents: Vec<EvidenceDoc>) -> Uuid {
        self.index.swap(Arc::new(MemoryStore::new(documents))).await
    }

    pub async fn set_job_description(&self, summary: String) {
        self.state.lock().await.job_description = Some(summary);
    }

    pub async fn set_resume_summary(&self, summary: String) {
        self.state.lock().await.resume_summary = Some(summary);
    }

    #[cfg(test)]
    async fn history_len(&self) -> usize {
        self.state.lock().await.history.len()
    }
}

/// Summarizes a raw job description into the routing/generation signal
/// stored on the session.
pub async fn summarize_job_description(
    backend: &dyn CompletionBackend,
    job_description: &str,
) -> Result<String, LlmError> {
    let prompt = SUMMARIZE_JD_PROMPT_TEMPLATE.replace("{job_description}", job_description);
    backend.complete(&prompt, SUMMARIZE_JD_SYSTEM).await
}

fn recent_suffix(history: &[ChatMessage], window: usize) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(window);
    history[start..].to_vec()
}

/// Shared session registry injected into route handlers.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, session: Arc<Session>) {
        self.sessions.write().await.insert(session.id, session);
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowConfig;
    use crate::search::{SearchError, SearchHit, WebSearch};
    use async_trait::async_trait;
    use std::time::Duration;

    struct CannedBackend(&'static str);

    #[async_trait]
    impl CompletionBackend for CannedBackend {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct NoSearch;

    #[async_trait]
    impl WebSearch for NoSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
            Ok(Vec::new())
        }
    }

    fn fallback_workflow() -> Workflow {
        // A backend that always answers "LLM" routes everything through the
        // conversational fallback, whose reply is the same canned string.
        Workflow::new(
            Arc::new(CannedBackend("LLM")),
            Arc::new(NoSearch),
            WorkflowConfig {
                node_timeout: Duration::from_secs(5),
                ..WorkflowConfig::default()
            },
        )
    }

    #[test]
    fn test_recent_suffix_bounds_history() {
        let history: Vec<ChatMessage> = (0..10)
            .map(|i| ChatMessage::user(format!("message {i}")))
            .collect();
        let recent = recent_suffix(&history, 4);
        assert_eq!(recent.len(), 4);
        assert_eq!(recent[0].content, "message 6");
    }

    #[test]
    fn test_recent_suffix_smaller_history_untouched() {
        let history = vec![ChatMessage::user("only one")];
        assert_eq!(recent_suffix(&history, 8).len(), 1);
    }

    #[tokio::test]
    async fn test_turn_appends_user_and_assistant_messages() {
        let session = Session::new(Arc::new(MemoryStore::default()));
        let workflow = fallback_workflow();

        session.run_turn(&workflow, "Hello there!", 8).await;
        assert_eq!(session.history_len().await, 2);

        session.run_turn(&workflow, "And again", 8).await;
        assert_eq!(session.history_len().await, 4);
    }

    #[tokio::test]
    async fn test_replace_documents_swaps_generation() {
        let session = Session::new(Arc::new(MemoryStore::default()));
        let before = session.index.generation().await;
        let after = session
            .replace_documents(vec![EvidenceDoc::resume("New resume content")])
            .await;
        assert_ne!(before, after);
        assert_eq!(session.index.generation().await, after);
    }

    #[tokio::test]
    async fn test_registry_round_trip() {
        let registry = SessionRegistry::default();
        let session = Arc::new(Session::new(Arc::new(MemoryStore::default())));
        let id = session.id;
        registry.insert(session).await;
        assert!(registry.get(id).await.is_some());
        assert!(registry.get(Uuid::new_v4()).await.is_none());
    }
}
