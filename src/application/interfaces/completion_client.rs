use async_trait::async_trait;

use crate::domain::DomainError;

/// An interface for sending a prompt to an LLM completion endpoint and
/// receiving the generated text.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details.  Consumers (e.g. [`crate::application::CustomizeEmailUseCase`])
/// remain decoupled from any particular provider or HTTP client library.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Human-readable name of the backing provider, used in logs and
    /// user-facing messages.
    fn name(&self) -> &str;

    /// Send `prompt` and return the generated text.
    ///
    /// Fails with [`DomainError::InvalidInput`] when the configured
    /// credential is empty (checked before any network activity) and with
    /// [`DomainError::Provider`] when the call fails, the endpoint answers
    /// with a non-success status, or the response does not have the
    /// expected shape.
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;
}
