//! Repository cloning

use anyhow::{Context, Result};
use git2::{FetchOptions, Repository};
use std::path::Path;

/// Clone `url` into `dest`.
///
/// Shallow clone (depth=1) of the default branch first; some servers and
/// local paths reject depth-limited fetches, so fall back to a full clone.
pub fn clone_repository(url: &str, dest: &Path) -> Result<()> {
    let normalized = normalize_github_url(url);
    let url = normalized.as_str();

    shallow_clone(url, dest).or_else(|_| {
        Repository::clone(url, dest)
            .with_context(|| format!("Failed cloning repository from {url}"))
    })?;
    Ok(())
}

/// Normalize a GitHub URL to the canonical HTTPS `.git` form.
///
/// Examples:
/// - `https://github.com/owner/repo`    → `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo/`   → `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo.git`→ unchanged
/// - non-GitHub URLs                    → unchanged
fn normalize_github_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.contains("github.com") && !trimmed.ends_with(".git") {
        format!("{}.git", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Shallow clone (depth=1) the default branch.
fn shallow_clone(url: &str, dest: &Path) -> Result<Repository> {
    let mut fo = FetchOptions::new();
    fo.depth(1);

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fo);

    builder.clone(url, dest).with_context(|| format!("Shallow clone from {url} failed"))
}
