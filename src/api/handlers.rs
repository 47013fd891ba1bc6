//! Request handlers

use crate::api::AppState;
use crate::error::ApiError;
use crate::ingest;
use crate::query;
use crate::session::{SessionId, SessionSummary, StoreError};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub(super) struct UploadRepoRequest {
    #[serde(rename = "repoUrl")]
    repo_url: String,
}

#[derive(Serialize)]
pub(super) struct UploadRepoResponse {
    message: String,
    #[serde(rename = "sessionId")]
    session_id: SessionId,
    #[serde(rename = "repoName")]
    repo_name: String,
}

#[derive(Deserialize)]
pub(super) struct AskRequest {
    #[serde(rename = "sessionId")]
    session_id: String,
    question: String,
}

#[derive(Serialize)]
pub(super) struct MessageResponse {
    message: String,
}

/// POST /api/upload-repo — clone, scan, and register a new session.
pub(super) async fn upload_repo(
    State(state): State<AppState>,
    Json(req): Json<UploadRepoRequest>,
) -> Result<Json<UploadRepoResponse>, ApiError> {
    let store = state.store.clone();
    let extensions = state.include_extensions.clone();

    // git2 and the tree scan are blocking; keep them off the async workers.
    let outcome = tokio::task::spawn_blocking(move || {
        ingest::ingest_repository(&store, &req.repo_url, &extensions)
    })
    .await
    .map_err(|e| ApiError::Ingest(anyhow::anyhow!(e)))?
    .map_err(ApiError::Ingest)?;

    Ok(Json(UploadRepoResponse {
        message: "Repository uploaded and parsed successfully".to_string(),
        session_id: outcome.session_id,
        repo_name: outcome.repo_name,
    }))
}

/// POST /api/ask — answer a question against one session's snapshot.
pub(super) async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<String>, ApiError> {
    let session_id = SessionId::parse(&req.session_id).ok_or(ApiError::SessionNotFound)?;
    let answer =
        query::answer_question(&state.store, state.provider.as_ref(), &session_id, &req.question)
            .await?;
    Ok(Json(answer))
}

/// GET /api/repos — list all sessions.
pub(super) async fn list_repos(State(state): State<AppState>) -> Json<Vec<SessionSummary>> {
    Json(state.store.list())
}

/// DELETE /api/repos/{session_id} — drop the session and its artifacts.
pub(super) async fn delete_repo(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let session_id = SessionId::parse(&session_id).ok_or(ApiError::UnknownRepository)?;
    state.store.delete(&session_id).map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::UnknownRepository,
        other => ApiError::Ingest(anyhow::anyhow!(other)),
    })?;
    Ok(Json(MessageResponse { message: "Repository deleted successfully".to_string() }))
}
