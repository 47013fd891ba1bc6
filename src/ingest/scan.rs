//! Working-tree scanner
//!
//! Recursively enumerates a cloned working tree for source files, skipping
//! dependency caches and generated lock files, and reads every match fully
//! into memory as UTF-8 text.

use crate::session::SessionFile;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Generated files excluded regardless of extension.
const DEFAULT_EXCLUDE_GLOBS: &[&str] = &["**/package-lock.json", "**/yarn.lock", "**/*.min.js"];

/// Directories skipped unconditionally during the walk.
const NOISE_DIRS: &[&str] = &["node_modules", "public", "__pycache__", ".venv", "venv"];

/// Source file scanner over one working tree.
pub struct SourceScanner {
    root: PathBuf,
    include_extensions: Vec<String>,
    exclude_globs: Vec<String>,
}

impl SourceScanner {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            include_extensions: crate::config::default_include_extensions(),
            exclude_globs: DEFAULT_EXCLUDE_GLOBS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Set file extensions to include (e.g., ".js", ".ts")
    pub fn include_extensions(mut self, extensions: Vec<String>) -> Self {
        if !extensions.is_empty() {
            self.include_extensions = extensions;
        }
        self
    }

    fn build_exclude_globset(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_globs {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        Ok(builder.build()?)
    }

    fn should_include_extension(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        if ext.is_empty() {
            return false;
        }
        let ext_with_dot = format!(".{}", ext);
        self.include_extensions.contains(&ext_with_dot)
    }

    /// Scan the working tree and read every matched file into memory.
    ///
    /// Files are returned in deterministic sorted order by relative path.
    /// A file that is not valid UTF-8 aborts the whole scan; ingestion has
    /// no partial-success path.
    pub fn scan(&self) -> Result<Vec<SessionFile>> {
        let exclude_globset = self.build_exclude_globset()?;

        // Skip noise directories and hidden directories (except .github),
        // mirroring the walk filters used when packing repos for prompting.
        let dir_filter = |entry: &ignore::DirEntry| -> bool {
            if let Some(file_type) = entry.file_type() {
                if file_type.is_dir() {
                    if let Some(name) = entry.file_name().to_str() {
                        if NOISE_DIRS.contains(&name) {
                            return false;
                        }
                        if name.starts_with('.') && name != ".github" {
                            return false;
                        }
                    }
                }
            }
            true
        };

        // The tree was cloned moments ago; gitignore handling stays off so
        // the snapshot reflects exactly what is checked in.
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(false)
            .hidden(false)
            .parents(false)
            .filter_entry(dir_filter);

        let mut matched: Vec<(PathBuf, String)> = Vec::new();
        for entry in builder.build().flatten() {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            let rel_path = match path.strip_prefix(&self.root) {
                Ok(p) => normalize_path(p.to_str().unwrap_or("")),
                Err(_) => continue,
            };

            if exclude_globset.is_match(&rel_path) {
                continue;
            }
            if !self.should_include_extension(path) {
                continue;
            }

            matched.push((path.to_path_buf(), rel_path));
        }

        matched.sort_by(|a, b| a.1.cmp(&b.1));

        let mut files = Vec::with_capacity(matched.len());
        for (path, rel_path) in matched {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed reading source file: {}", path.display()))?;
            files.push(SessionFile { path: rel_path, content });
        }
        Ok(files)
    }
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
