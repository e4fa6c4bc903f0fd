pub mod health;
pub mod sessions;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id/documents",
            post(sessions::handle_replace_documents),
        )
        .route(
            "/api/v1/sessions/:id/job-description",
            post(sessions::handle_job_description),
        )
        .route("/api/v1/sessions/:id/chat", post(sessions::handle_chat))
        .with_state(state)
}
