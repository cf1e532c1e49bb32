use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::DomainError;

const DEFAULT_REPLY: &str = "Subject: Welcome aboard!\n\n\
Hi there,\n\nThis is a canned customization produced without calling any provider. \
Run without --mock to get a real one.\n\nBest,\nMailTailor";

/// A [`CompletionClient`] that returns a canned reply without any network
/// activity. Used by the test suite and by the `--mock` flag for offline
/// runs.
pub struct MockClient {
    reply: String,
    calls: AtomicUsize,
}

impl MockClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `complete` has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY)
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("MockClient: returning canned reply for {} char prompt", prompt.len());
        Ok(self.reply.clone())
    }
}
