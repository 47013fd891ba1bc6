//! HTTP API

mod handlers;

use crate::provider::ModelProvider;
use crate::session::SessionStore;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared per-process state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub provider: Arc<dyn ModelProvider>,
    pub include_extensions: Vec<String>,
}

/// Build the axum router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/upload-repo", post(handlers::upload_repo))
        .route("/api/ask", post(handlers::ask))
        .route("/api/repos", get(handlers::list_repos))
        .route("/api/repos/{session_id}", delete(handlers::delete_repo))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
