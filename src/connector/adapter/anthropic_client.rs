use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{DomainError, Provider};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1000;

/// Anthropic Messages API request payload.
#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal subset of the Messages API response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

/// HTTP client for the Anthropic Messages API.
///
/// Implements [`CompletionClient`]; one POST per call, no retries, no
/// streaming, reqwest's default timeout.
///
/// **Base URL**: defaults to `https://api.anthropic.com`. Override with
/// `ANTHROPIC_BASE_URL` (or the constructor argument) to target any
/// Anthropic-API-compatible server, e.g. a locally running LM Studio
/// instance.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl AnthropicClient {
    /// Create a new client with an explicit API key, model, and endpoint URL.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), MESSAGES_PATH);
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            url,
        }
    }

    /// Convenience constructor reading configuration from the environment:
    /// - `ANTHROPIC_API_KEY`  — may be absent; `complete` then fails before dispatch
    /// - `ANTHROPIC_BASE_URL` — optional; defaults to `https://api.anthropic.com`
    pub fn from_env(model: impl Into<String>) -> Self {
        let key = std::env::var(Provider::Anthropic.api_key_env()).unwrap_or_default();
        let base =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(key, model, base)
    }

    /// Replace the API key, e.g. when one was passed on the command line.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Extract the generated text from a raw response body.
    fn parse_response(body: &str) -> Result<String, DomainError> {
        let response: ApiResponse = serde_json::from_str(body).map_err(|e| {
            DomainError::provider(format!("AnthropicClient: unexpected response shape: {e}"))
        })?;

        response
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| {
                DomainError::provider("AnthropicClient: response contained no content blocks")
            })
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    fn name(&self) -> &str {
        Provider::Anthropic.display_name()
    }

    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::invalid_input(
                "Please enter your Anthropic API key",
            ));
        }

        let request = ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("AnthropicClient: POST {} (model {})", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", self.api_key.trim())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("AnthropicClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicClient: API returned {status}: {body}");
            return Err(DomainError::provider(format!(
                "AnthropicClient: API returned {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            DomainError::provider(format!("AnthropicClient: failed to read response: {e}"))
        })?;
        Self::parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_response_extracts_content_text() {
        let body = r#"{"content":[{"type":"text","text":"X"}]}"#;
        assert_eq!(AnthropicClient::parse_response(body).unwrap(), "X");
    }

    #[test]
    fn parse_response_takes_first_block() {
        let body = r#"{"content":[{"text":"first"},{"text":"second"}]}"#;
        assert_eq!(AnthropicClient::parse_response(body).unwrap(), "first");
    }

    #[test]
    fn parse_response_rejects_empty_content() {
        let err = AnthropicClient::parse_response(r#"{"content":[]}"#).unwrap_err();
        assert!(err.is_provider());
    }

    #[test]
    fn parse_response_rejects_malformed_body() {
        let err = AnthropicClient::parse_response("<html>busy</html>").unwrap_err();
        assert!(err.is_provider());
    }

    #[tokio::test]
    async fn complete_with_empty_key_fails_without_network() {
        let client = AnthropicClient::new("", "claude-3-sonnet-20240229", "http://localhost:9");
        let err = client.complete("prompt").await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
