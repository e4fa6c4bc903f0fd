//! Axum route handlers for the session and chat API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::{summarize_job_description, Session};
use crate::state::AppState;
use crate::store::MemoryStore;
use crate::workflow::state::{DegradeReason, EvidenceDoc, GradeVerdict, RouteDecision};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// A pre-chunked résumé passage supplied by the ingestion collaborator.
#[derive(Debug, Deserialize)]
pub struct DocumentInput {
    pub content: String,
    pub section: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub documents: Vec<DocumentInput>,
    pub resume_summary: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub document_count: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceDocumentsRequest {
    pub documents: Vec<DocumentInput>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceDocumentsResponse {
    pub index_generation: Uuid,
    pub document_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct JobDescriptionResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub route: Option<RouteDecision>,
    pub verdict: Option<GradeVerdict>,
    pub degraded: Option<DegradeReason>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

fn into_evidence(documents: Vec<DocumentInput>) -> Vec<EvidenceDoc> {
    documents
        .into_iter()
        .map(|d| {
            let mut doc = EvidenceDoc::resume(d.content);
            doc.section = d.section;
            doc
        })
        .collect()
}

/// POST /api/v1/sessions
///
/// Creates a session, optionally seeding documents, a résumé summary, and a
/// job description (summarized before storage).
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let documents = into_evidence(request.documents);
    let document_count = documents.len();

    let session = Arc::new(Session::new(Arc::new(MemoryStore::new(documents))));

    if let Some(summary) = request.resume_summary {
        session.set_resume_summary(summary).await;
    }

    if let Some(jd) = request.job_description {
        if !jd.trim().is_empty() {
            let summary = summarize_job_description(state.llm.as_ref(), &jd)
                .await
                .map_err(|e| AppError::Llm(format!("JD summarization failed: {e}")))?;
            session.set_job_description(summary).await;
        }
    }

    let session_id = session.id;
    let created_at = session.created_at;
    state.sessions.insert(session).await;

    Ok(Json(CreateSessionResponse {
        session_id,
        document_count,
        created_at,
    }))
}

/// POST /api/v1/sessions/:id/documents
///
/// Rebuilds the session's document index from scratch and atomically swaps
/// it in. In-flight turns keep reading the generation they resolved.
pub async fn handle_replace_documents(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ReplaceDocumentsRequest>,
) -> Result<Json<ReplaceDocumentsResponse>, AppError> {
    if request.documents.is_empty() {
        return Err(AppError::Validation(
            "documents cannot be empty".to_string(),
        ));
    }

    let session = get_session(&state, session_id).await?;
    let documents = into_evidence(request.documents);
    let document_count = documents.len();
    let index_generation = session.replace_documents(documents).await;

    Ok(Json(ReplaceDocumentsResponse {
        index_generation,
        document_count,
    }))
}

/// POST /api/v1/sessions/:id/job-description
///
/// Summarizes and attaches a job description as the session's routing and
/// generation signal.
pub async fn handle_job_description(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<JobDescriptionResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let session = get_session(&state, session_id).await?;
    let summary = summarize_job_description(state.llm.as_ref(), &request.job_description)
        .await
        .map_err(|e| AppError::Llm(format!("JD summarization failed: {e}")))?;
    session.set_job_description(summary.clone()).await;

    Ok(Json(JobDescriptionResponse { summary }))
}

/// POST /api/v1/sessions/:id/chat
///
/// Runs one question through the answering workflow. Always returns answer
/// text; degraded paths are flagged, never surfaced as errors.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session = get_session(&state, session_id).await?;

    let outcome = session
        .run_turn(
            &state.workflow,
            &request.question,
            state.config.workflow.history_window,
        )
        .await;

    Ok(Json(ChatResponse {
        answer: outcome.answer,
        route: outcome.route,
        verdict: outcome.verdict,
        degraded: outcome.degraded,
    }))
}

async fn get_session(state: &AppState, session_id: Uuid) -> Result<Arc<Session>, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}
