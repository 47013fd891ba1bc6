//! askrepo: Ask questions about a GitHub repository
//!
//! Clones a repository, scans its source files into an in-memory snapshot,
//! and answers natural-language questions about the code by forwarding the
//! whole snapshot plus the question to a hosted language model. Sessions are
//! persisted as JSON records so repeated questions avoid re-cloning.

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod provider;
pub mod query;
pub mod session;
