use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{DomainError, Provider};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const MAX_TOKENS: u32 = 1000;

/// OpenAI Chat Completions request payload.
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

/// Minimal subset of the Chat Completions response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

/// HTTP client for the OpenAI Chat Completions API.
///
/// Implements [`CompletionClient`]; one POST per call, no retries, no
/// streaming, reqwest's default timeout.
///
/// **Base URL**: defaults to `https://api.openai.com`. Override with
/// `OPENAI_BASE_URL` (or the constructor argument) to target any
/// OpenAI-API-compatible server.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiClient {
    /// Create a new client with an explicit API key, model, and endpoint URL.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            url,
        }
    }

    /// Convenience constructor reading configuration from the environment:
    /// - `OPENAI_API_KEY`  — may be absent; `complete` then fails before dispatch
    /// - `OPENAI_BASE_URL` — optional; defaults to `https://api.openai.com`
    pub fn from_env(model: impl Into<String>) -> Self {
        let key = std::env::var(Provider::OpenAi.api_key_env()).unwrap_or_default();
        let base =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
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
            DomainError::provider(format!("OpenAiClient: unexpected response shape: {e}"))
        })?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DomainError::provider("OpenAiClient: response contained no choices"))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn name(&self) -> &str {
        Provider::OpenAi.display_name()
    }

    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::invalid_input("Please enter your OpenAI API key"));
        }

        let request = ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("OpenAiClient: POST {} (model {})", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.trim())
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("OpenAiClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAiClient: API returned {status}: {body}");
            return Err(DomainError::provider(format!(
                "OpenAiClient: API returned {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            DomainError::provider(format!("OpenAiClient: failed to read response: {e}"))
        })?;
        Self::parse_response(&body)
    }
}
