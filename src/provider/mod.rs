//! Model providers

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

/// A hosted language model reachable over HTTPS.
///
/// The query path depends only on this trait so tests can substitute a mock
/// and assert the model is never called for unknown sessions.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Submit one prompt and return the raw text response verbatim.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
