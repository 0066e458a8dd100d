use async_trait::async_trait;

use crate::domain::{ChatMessage, Completion, DataSource, DomainError};

/// Sends a conversation to a hosted completion endpoint that grounds its answer
/// against a search index.
///
/// Implementors own transport, authentication and wire format. A single call is
/// made per request; retries and timeouts, if any, are the implementor's concern.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        data_source: &DataSource,
    ) -> Result<Completion, DomainError>;

    /// Short name for log lines.
    fn name(&self) -> &str;
}
