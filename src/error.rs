//! API error taxonomy and HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to HTTP clients.
///
/// Underlying causes (network vs. auth vs. disk, timeout vs. quota) are
/// deliberately collapsed into opaque categories; clients only see a short
/// human-readable string and the status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown session id on a query (400).
    #[error("No repository found for the provided session ID")]
    SessionNotFound,

    /// Unknown session id on a delete (404).
    #[error("Repository not found")]
    UnknownRepository,

    /// Clone, scan, or persistence failed during ingestion (500).
    #[error("Failed to upload and parse repository")]
    Ingest(anyhow::Error),

    /// The external model call failed (500).
    #[error("An error occurred while processing with the Gemini API")]
    Model(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::SessionNotFound => StatusCode::BAD_REQUEST,
            ApiError::UnknownRepository => StatusCode::NOT_FOUND,
            ApiError::Ingest(_) | ApiError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ApiError::Ingest(source) => tracing::error!("ingestion failed: {source:#}"),
            ApiError::Model(source) => tracing::error!("model call failed: {source:#}"),
            _ => {}
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
