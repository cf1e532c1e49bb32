use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{DomainError, Provider};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Gemini `generateContent` request payload.
#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(serde::Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(serde::Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(serde::Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Minimal subset of the `generateContent` response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

/// HTTP client for the Google Gemini `generateContent` API.
///
/// Implements [`CompletionClient`]; one POST per call, no retries, no
/// streaming, reqwest's default timeout. The model name is part of the
/// endpoint path, so it is baked into the URL at construction time.
///
/// **Base URL**: defaults to `https://generativelanguage.googleapis.com`.
/// Override with `GOOGLE_BASE_URL` (or the constructor argument).
pub struct GoogleClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl GoogleClient {
    /// Create a new client with an explicit API key, model, and endpoint URL.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let model: String = model.into();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            base.trim_end_matches('/'),
            model
        );
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model,
            url,
        }
    }

    /// Convenience constructor reading configuration from the environment:
    /// - `GOOGLE_API_KEY`  — may be absent; `complete` then fails before dispatch
    /// - `GOOGLE_BASE_URL` — optional; defaults to the Google endpoint
    pub fn from_env(model: impl Into<String>) -> Self {
        let key = std::env::var(Provider::Google.api_key_env()).unwrap_or_default();
        let base =
            std::env::var("GOOGLE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(key, model, base)
    }

    /// Replace the API key, e.g. when one was passed on the command line.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Extract the generated text from a raw response body.
    ///
    /// A candidate's text may be split across several parts; they are
    /// concatenated in order.
    fn parse_response(body: &str) -> Result<String, DomainError> {
        let response: ApiResponse = serde_json::from_str(body).map_err(|e| {
            DomainError::provider(format!("GoogleClient: unexpected response shape: {e}"))
        })?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("GoogleClient: response contained no candidates"))?;

        if candidate.content.parts.is_empty() {
            return Err(DomainError::provider(
                "GoogleClient: candidate contained no text parts",
            ));
        }

        Ok(candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect())
    }
}

#[async_trait]
impl CompletionClient for GoogleClient {
    fn name(&self) -> &str {
        Provider::Google.display_name()
    }

    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::invalid_input("Please enter your Google API key"));
        }

        let request = ApiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        debug!("GoogleClient: POST {} (model {})", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", self.api_key.trim())
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("GoogleClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GoogleClient: API returned {status}: {body}");
            return Err(DomainError::provider(format!(
                "GoogleClient: API returned {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            DomainError::provider(format!("GoogleClient: failed to read response: {e}"))
        })?;
        Self::parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_response_extracts_candidate_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hello Alex"}],"role":"model"}}]}"#;
        assert_eq!(GoogleClient::parse_response(body).unwrap(), "Hello Alex");
    }

    #[test]
    fn parse_response_concatenates_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"Alex"}]}}]}"#;
        assert_eq!(GoogleClient::parse_response(body).unwrap(), "Hello Alex");
    }

    #[test]
    fn parse_response_rejects_empty_candidates() {
        let err = GoogleClient::parse_response(r#"{"candidates":[]}"#).unwrap_err();
        assert!(err.is_provider());
    }

    #[test]
    fn parse_response_rejects_malformed_body() {
        let err = GoogleClient::parse_response(r#"{"error":{"code":400}}"#).unwrap_err();
        assert!(err.is_provider());
    }

    #[test]
    fn model_is_baked_into_endpoint_path() {
        let client = GoogleClient::new("key", "gemini-pro", "http://localhost:9/");
        assert_eq!(
            client.url,
            "http://localhost:9/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn complete_with_empty_key_fails_without_network() {
        let client = GoogleClient::new("  ", "gemini-pro", "http://localhost:9");
        let err = client.complete("prompt").await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
