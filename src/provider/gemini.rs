//! Google Gemini provider
//!
//! Single synchronous `generateContent` call per question. The API key comes
//! from `GEMINI_API_KEY` (or the config file); there is no fallback secret.

use crate::config::GeminiConfig;
use crate::provider::ModelProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct GeminiClient {
    api_base: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

#[async_trait]
impl ModelProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "Gemini API key not found. Set the GEMINI_API_KEY environment variable \
                 or the [gemini] api_key config field."
            )
        })?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt.to_string() }],
            }],
            generation_config: GenerationConfig { temperature: 0.7, max_output_tokens: 8192 },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base, self.model, api_key
        );

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({status}): {error_text}");
        }

        let result: GenerateContentResponse = response.json().await?;

        if let Some(err) = result.error {
            anyhow::bail!("Gemini API error: {}", err.message);
        }

        result
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| anyhow::anyhow!("No response from Gemini"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(&GeminiConfig {
            model: "gemini-pro".to_string(),
            api_base: server.uri(),
            api_key: Some("test-key".to_string()),
        })
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: "Hello".to_string() }],
            }],
            generation_config: GenerationConfig { temperature: 0.7, max_output_tokens: 8192 },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[tokio::test]
    async fn test_generate_extracts_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    { "content": { "parts": [ { "text": "the answer" } ] } }
                ]
            })))
            .mount(&server)
            .await;

        let answer = client_for(&server).generate("question").await.unwrap();
        assert_eq!(answer, "the answer");
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": { "message": "quota exceeded" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("question").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_generate_surfaces_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("question").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_generate_without_key_fails_before_network() {
        let client = GeminiClient::new(&GeminiConfig {
            model: "gemini-pro".to_string(),
            api_base: "http://127.0.0.1:1".to_string(),
            api_key: None,
        });
        let err = client.generate("question").await.unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
