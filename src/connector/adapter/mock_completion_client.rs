use async_trait::async_trait;
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{
    ChatMessage, Citation, Completion, ContentPart, DataSource, DomainError, MessageContext, Role,
};

/// Offline [`CompletionClient`] that answers by echoing the latest user message and
/// cites one synthetic document from the requested index.
///
/// Useful for exercising the CLI without a deployed service.
#[derive(Debug, Default)]
pub struct MockCompletionClient;

impl MockCompletionClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        data_source: &DataSource,
    ) -> Result<Completion, DomainError> {
        let question = messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::User)
            .map(ChatMessage::text)
            .unwrap_or_default();

        debug!(
            "Mock completion for {} messages against index {}",
            messages.len(),
            data_source.index_name()
        );

        let citation = Citation::new(
            format!("{} (mock)", data_source.index_name()),
            format!("Mock document retrieved for: {question}"),
        )
        .with_filepath("mock.md")
        .with_chunk_id("0");

        Ok(Completion::new(vec![ContentPart::Text(format!(
            "You asked: {question} [doc1]"
        ))])
        .with_context(MessageContext::new(vec![citation]).with_intent(question)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
