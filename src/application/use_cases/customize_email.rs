use std::sync::Arc;

use tracing::{debug, info};

use crate::application::CompletionClient;
use crate::domain::{CustomizationRequest, DomainError};

/// Customize an email template for a recipient.
///
/// Validates the request, renders the prompt, and dispatches one completion
/// call through the configured [`CompletionClient`]. No retries and no
/// fallback between providers: a single request is in flight at a time and
/// the caller awaits its outcome.
pub struct CustomizeEmailUseCase {
    completion_client: Arc<dyn CompletionClient>,
}

impl CustomizeEmailUseCase {
    pub fn new(completion_client: Arc<dyn CompletionClient>) -> Self {
        Self { completion_client }
    }

    pub async fn execute(&self, request: &CustomizationRequest) -> Result<String, DomainError> {
        request.validate()?;

        let prompt = request.render_prompt();
        debug!("Rendered prompt ({} chars)", prompt.len());

        info!(
            "Requesting email customization from {}",
            self.completion_client.name()
        );
        self.completion_client.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Records how often it was called so tests can assert that validation
    /// failures never reach the network.
    struct CountingClient {
        calls: AtomicUsize,
    }

    impl CountingClient {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for CountingClient {
        fn name(&self) -> &str {
            "counting"
        }

        async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {prompt}"))
        }
    }

    #[tokio::test]
    async fn test_execute_dispatches_valid_request() {
        let client = Arc::new(CountingClient::new());
        let use_case = CustomizeEmailUseCase::new(client.clone());

        let request = CustomizationRequest::new("Dear {name}", "Alex");
        let text = use_case.execute(&request).await.unwrap();

        assert!(text.starts_with("echo: Email Template:"));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_template_fails_before_dispatch() {
        let client = Arc::new(CountingClient::new());
        let use_case = CustomizeEmailUseCase::new(client.clone());

        let request = CustomizationRequest::new("", "Alex");
        let err = use_case.execute(&request).await.unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_context_fails_before_dispatch() {
        let client = Arc::new(CountingClient::new());
        let use_case = CustomizeEmailUseCase::new(client.clone());

        let request = CustomizationRequest::new("Dear {name}", "  ");
        let err = use_case.execute(&request).await.unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(client.call_count(), 0);
    }
}
