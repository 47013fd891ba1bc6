//! Session data model
//!
//! A session binds one ingested repository snapshot to an opaque identifier.
//! The durable JSON record keeps the original wire field names (`repoUrl`,
//! `codeFiles`, ...) so records are human-readable and stable.

pub mod store;

pub use store::{SessionStore, StoreError};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque session identifier, freshly generated per ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client-supplied id. Anything that is not a UUID cannot name
    /// an existing session.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One source file captured at ingestion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    #[serde(rename = "filePath")]
    pub path: String,
    pub content: String,
}

/// One ingested repository snapshot. The id is not part of the record; the
/// durable record's file stem carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "repoUrl")]
    pub source_url: String,
    #[serde(rename = "repoName")]
    pub display_name: String,
    #[serde(rename = "codeFiles")]
    pub files: Vec<SessionFile>,
}

/// Listing entry for `GET /api/repos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    #[serde(rename = "repoName")]
    pub repo_name: String,
}
