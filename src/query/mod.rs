//! Question answering
//!
//! Builds one prompt from the whole cached snapshot plus the question and
//! submits it as a single model call. There is no chunking, truncation, or
//! token budgeting: a large repository produces a proportionally large
//! prompt. See README "Known limits".

use crate::error::ApiError;
use crate::provider::ModelProvider;
use crate::session::{SessionFile, SessionId, SessionStore};

/// Concatenate every cached file into one text context and wrap it together
/// with the question in the instructional template.
pub fn build_prompt(files: &[SessionFile], question: &str) -> String {
    let context = files
        .iter()
        .map(|file| format!("Filename: {}\n\n{}", file.path, file.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Here is the relevant code context:\n\
         {context}\n\
         \n\
         Question: {question}\n\
         \n\
         Please provide a detailed and specific response. If there are any bugs, \
         explain the cause and suggest a fix. If the code can be improved, provide \
         optimization suggestions. Ensure the response is clear and actionable."
    )
}

/// Answer `question` against the session's cached snapshot.
///
/// Fails with [`ApiError::SessionNotFound`] before any provider call when the
/// id is unknown; the model's raw text response is returned verbatim.
pub async fn answer_question(
    store: &SessionStore,
    provider: &dyn ModelProvider,
    session_id: &SessionId,
    question: &str,
) -> Result<String, ApiError> {
    let session = store.get(session_id).ok_or(ApiError::SessionNotFound)?;
    let prompt = build_prompt(&session.files, question);
    provider.generate(&prompt).await.map_err(ApiError::Model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_files() -> Vec<SessionFile> {
        vec![
            SessionFile { path: "a.js".to_string(), content: "const a = 1;".to_string() },
            SessionFile { path: "lib/b.js".to_string(), content: "module.exports = {};".to_string() },
            SessionFile { path: "lib/c.js".to_string(), content: "// c".to_string() },
        ]
    }

    #[test]
    fn test_prompt_contains_every_file_exactly_once() {
        let prompt = build_prompt(&fixture_files(), "What does this do?");

        for (path, content) in
            [("a.js", "const a = 1;"), ("lib/b.js", "module.exports = {};"), ("lib/c.js", "// c")]
        {
            assert_eq!(prompt.matches(&format!("Filename: {path}")).count(), 1);
            assert_eq!(prompt.matches(content).count(), 1);
        }
        assert!(prompt.contains("Question: What does this do?"));
    }

    #[test]
    fn test_prompt_empty_snapshot() {
        let prompt = build_prompt(&[], "anything here?");
        assert!(prompt.contains("Question: anything here?"));
        assert!(!prompt.contains("Filename:"));
    }
}
