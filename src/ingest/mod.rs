//! Repository ingestion
//!
//! Turns a source URL into a new session: generate an id, clone into a fresh
//! working directory named by that id, scan the tree, and hand the snapshot
//! to the session store. Either a fully populated session is registered or
//! nothing is.

pub mod clone;
pub mod scan;

use crate::session::{Session, SessionId, SessionStore};
use anyhow::Result;
use scan::SourceScanner;

/// Result of a successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub session_id: SessionId,
    pub repo_name: String,
}

/// Ingest the repository at `url` into `store`.
///
/// The URL is not validated up front; an invalid URL surfaces as a clone
/// failure. On any failure the working directory is removed again so a
/// failed ingestion leaves no orphaned tree behind.
pub fn ingest_repository(
    store: &SessionStore,
    url: &str,
    include_extensions: &[String],
) -> Result<IngestOutcome> {
    let session_id = SessionId::generate();
    let workdir = store.workdir(&session_id);

    let outcome = (|| {
        clone::clone_repository(url, &workdir)?;

        let files = SourceScanner::new(workdir.clone())
            .include_extensions(include_extensions.to_vec())
            .scan()?;

        let repo_name = repo_display_name(url);
        store.put(
            session_id,
            Session {
                source_url: url.to_string(),
                display_name: repo_name.clone(),
                files,
            },
        )?;

        tracing::info!("ingested {url} as session {session_id} ({repo_name})");
        Ok(IngestOutcome { session_id, repo_name })
    })();

    if outcome.is_err() && workdir.exists() {
        if let Err(e) = std::fs::remove_dir_all(&workdir) {
            tracing::warn!("failed cleaning up working tree {}: {e}", workdir.display());
        }
    }
    outcome
}

/// Derive the display name from a repository URL: strip a trailing `.git`
/// and everything up to the last path separator.
pub fn repo_display_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    trimmed.rsplit('/').next().unwrap_or(trimmed).to_string()
}
