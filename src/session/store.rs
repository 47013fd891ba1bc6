//! Durable session store
//!
//! Filesystem-as-database: one pretty-printed JSON record per session under
//! the sessions root, one cloned working tree per session under the repos
//! root. The in-memory index is rebuilt from the records at process start;
//! lookups never touch the filesystem.

use crate::session::{Session, SessionId, SessionSummary};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("failed to encode session record")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Mapping from session id to repository snapshot.
///
/// All mutation of the index and of the on-disk artifacts is funneled through
/// this type so the three artifacts (index entry, JSON record, working tree)
/// stay in step. The mutex makes concurrent request handlers safe on the
/// multi-threaded runtime.
pub struct SessionStore {
    repos_dir: PathBuf,
    sessions_dir: PathBuf,
    index: Mutex<HashMap<SessionId, Session>>,
}

impl SessionStore {
    /// Create both roots if missing and rehydrate the index from any
    /// persisted records. An empty store is valid.
    pub fn open(repos_dir: impl Into<PathBuf>, sessions_dir: impl Into<PathBuf>) -> Result<Self> {
        let repos_dir = repos_dir.into();
        let sessions_dir = sessions_dir.into();

        fs::create_dir_all(&repos_dir)
            .with_context(|| format!("Failed creating repos dir: {}", repos_dir.display()))?;
        fs::create_dir_all(&sessions_dir)
            .with_context(|| format!("Failed creating sessions dir: {}", sessions_dir.display()))?;

        let index = load_all(&sessions_dir)?;
        tracing::info!("loaded {} session(s) from {}", index.len(), sessions_dir.display());

        Ok(Self { repos_dir, sessions_dir, index: Mutex::new(index) })
    }

    /// Working-tree directory for a session. Only ingestion and `delete`
    /// touch it.
    pub fn workdir(&self, id: &SessionId) -> PathBuf {
        self.repos_dir.join(id.to_string())
    }

    fn record_path(&self, id: &SessionId) -> PathBuf {
        self.sessions_dir.join(format!("{id}.json"))
    }

    /// Persist the record and update the index, overwriting any existing
    /// entry with the same id.
    pub fn put(&self, id: SessionId, session: Session) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(&session)?;
        fs::write(self.record_path(&id), body)?;
        self.index.lock().insert(id, session);
        Ok(())
    }

    /// Clone of the cached session, served from memory only.
    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.index.lock().get(id).cloned()
    }

    /// All sessions as (id, display name) pairs, order unspecified.
    pub fn list(&self) -> Vec<SessionSummary> {
        self.index
            .lock()
            .iter()
            .map(|(id, session)| SessionSummary {
                session_id: *id,
                repo_name: session.display_name.clone(),
            })
            .collect()
    }

    /// Remove the index entry, the durable record, and the working tree.
    ///
    /// Once the index entry is gone the delete counts as done; a failing
    /// filesystem removal is logged rather than rolled back.
    pub fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        if self.index.lock().remove(id).is_none() {
            return Err(StoreError::NotFound(*id));
        }

        let record = self.record_path(id);
        if let Err(e) = fs::remove_file(&record) {
            tracing::warn!("failed removing session record {}: {e}", record.display());
        }
        let workdir = self.workdir(id);
        if let Err(e) = fs::remove_dir_all(&workdir) {
            tracing::warn!("failed removing working tree {}: {e}", workdir.display());
        }
        Ok(())
    }
}

/// Scan the sessions root for `<uuid>.json` records. Malformed records are
/// skipped with a warning so one corrupt file cannot take down the store.
fn load_all(sessions_dir: &Path) -> Result<HashMap<SessionId, Session>> {
    let mut index = HashMap::new();

    for entry in fs::read_dir(sessions_dir)
        .with_context(|| format!("Failed reading sessions dir: {}", sessions_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let Some(id) = SessionId::parse(stem) else {
            tracing::warn!("skipping session record with non-uuid name: {}", path.display());
            continue;
        };

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("skipping unreadable session record {}: {e}", path.display());
                continue;
            }
        };
        match serde_json::from_str::<Session>(&content) {
            Ok(session) => {
                index.insert(id, session);
            }
            Err(e) => {
                tracing::warn!("skipping corrupt session record {}: {e}", path.display());
            }
        }
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionFile;
    use tempfile::TempDir;

    fn sample_session(name: &str) -> Session {
        Session {
            source_url: format!("https://github.com/org/{name}.git"),
            display_name: name.to_string(),
            files: vec![SessionFile {
                path: "index.js".to_string(),
                content: "console.log('hi');\n".to_string(),
            }],
        }
    }

    fn open_store(temp_dir: &TempDir) -> SessionStore {
        SessionStore::open(temp_dir.path().join("repos"), temp_dir.path().join("sessions"))
            .unwrap()
    }

    #[test]
    fn test_put_get_list_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);

        let id = SessionId::generate();
        store.put(id, sample_session("myrepo")).unwrap();

        let fetched = store.get(&id).unwrap();
        assert_eq!(fetched.display_name, "myrepo");
        assert_eq!(fetched.files.len(), 1);

        let listing = store.list();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].session_id, id);
        assert_eq!(listing[0].repo_name, "myrepo");

        store.delete(&id).unwrap();
        assert!(store.get(&id).is_none());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_delete_unknown_signals_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);

        let err = store.delete(&SessionId::generate()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_delete_removes_record_and_working_tree() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);

        let id = SessionId::generate();
        store.put(id, sample_session("myrepo")).unwrap();

        let workdir = store.workdir(&id);
        fs::create_dir_all(&workdir).unwrap();
        fs::write(workdir.join("index.js"), "x").unwrap();

        let record = temp_dir.path().join("sessions").join(format!("{id}.json"));
        assert!(record.exists());

        store.delete(&id).unwrap();
        assert!(!record.exists());
        assert!(!workdir.exists());
    }

    #[test]
    fn test_restart_reproduces_listing() {
        let temp_dir = TempDir::new().unwrap();
        let id_a = SessionId::generate();
        let id_b = SessionId::generate();

        {
            let store = open_store(&temp_dir);
            store.put(id_a, sample_session("alpha")).unwrap();
            store.put(id_b, sample_session("beta")).unwrap();
        }

        // "Restart": a fresh store over the same directories.
        let store = open_store(&temp_dir);
        let mut names: Vec<String> =
            store.list().into_iter().map(|s| s.repo_name).collect();
        names.sort();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
        assert_eq!(store.get(&id_a).unwrap().display_name, "alpha");
        assert_eq!(store.get(&id_b).unwrap().display_name, "beta");
    }

    #[test]
    fn test_corrupt_record_skipped_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let id = SessionId::generate();

        {
            let store = open_store(&temp_dir);
            store.put(id, sample_session("good")).unwrap();
        }

        let sessions_dir = temp_dir.path().join("sessions");
        fs::write(sessions_dir.join(format!("{}.json", SessionId::generate())), "{ not json")
            .unwrap();
        fs::write(sessions_dir.join("not-a-uuid.json"), "{}").unwrap();

        let store = open_store(&temp_dir);
        let listing = store.list();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].repo_name, "good");
    }

    #[test]
    fn test_put_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);

        let id = SessionId::generate();
        store.put(id, sample_session("first")).unwrap();
        store.put(id, sample_session("second")).unwrap();

        assert_eq!(store.get(&id).unwrap().display_name, "second");
        assert_eq!(store.list().len(), 1);
    }
}
