use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::application::CompletionClient;
use crate::domain::{ChatMessage, ChatResponse, DataSource, DomainError, Settings};

/// Most recent caller messages sent per request. The system message is not counted.
pub const MAX_HISTORY_MESSAGES: usize = 20;

/// Answers a conversation with a completion grounded on the configured search index.
///
/// Holds only immutable state, so one instance can serve concurrent callers.
pub struct GetChatCompletionUseCase {
    settings: Settings,
    completion_client: Arc<dyn CompletionClient>,
}

impl GetChatCompletionUseCase {
    /// Fails with a configuration error if the endpoint, chat deployment, search URL
    /// or index name is missing. Nothing can be served without them.
    pub fn new(
        settings: Settings,
        completion_client: Arc<dyn CompletionClient>,
    ) -> Result<Self, DomainError> {
        settings.validate()?;

        info!(
            client = completion_client.name(),
            index = settings.search_index_name().unwrap_or_default(),
            "GetChatCompletionUseCase initialized with settings"
        );

        Ok(Self {
            settings,
            completion_client,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Never fails: any error from the completion call is logged and returned in
    /// [`ChatResponse::error`].
    pub async fn execute(&self, history: &[ChatMessage]) -> ChatResponse {
        match self.complete(history).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Error in chat completion");
                ChatResponse::failure(format!("An error occurred: {e}"))
            }
        }
    }

    async fn complete(&self, history: &[ChatMessage]) -> Result<ChatResponse, DomainError> {
        let start_time = Instant::now();

        let messages = self.build_messages(history)?;
        let data_source = self.build_data_source()?;

        debug!(
            "Sending {} messages ({} from history) to {}",
            messages.len(),
            history.len().min(MAX_HISTORY_MESSAGES),
            self.completion_client.name()
        );

        let completion = self
            .completion_client
            .complete(&messages, &data_source)
            .await?;

        let citations = completion
            .context
            .map(|ctx| ctx.citations)
            .unwrap_or_default();

        debug!(
            "Received {} content parts and {} citations in {:.2}s",
            completion.content.len(),
            citations.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(ChatResponse::success(completion.content, citations))
    }

    /// The system message followed by at most the last [`MAX_HISTORY_MESSAGES`] of
    /// `history`, in their original order.
    pub fn build_messages(&self, history: &[ChatMessage]) -> Result<Vec<ChatMessage>, DomainError> {
        let system_prompt = self
            .settings
            .system_prompt()
            .ok_or_else(|| DomainError::configuration("SystemPrompt is not set"))?;

        let recent = bounded_history(history);
        if recent.len() < history.len() {
            debug!(
                "Dropped {} oldest messages from history",
                history.len() - recent.len()
            );
        }

        let mut messages = Vec::with_capacity(recent.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(recent);
        Ok(messages)
    }

    pub fn build_data_source(&self) -> Result<DataSource, DomainError> {
        let endpoint = self
            .settings
            .search_service_url()
            .ok_or_else(|| DomainError::configuration("SearchServiceUrl is not set"))?;
        let index_name = self
            .settings
            .search_index_name()
            .ok_or_else(|| DomainError::configuration("SearchIndexName is not set"))?;

        let data_source = DataSource::azure_search(endpoint, index_name);
        Ok(match self.settings.embedding_deployment() {
            Some(deployment) => data_source.with_embedding_deployment(deployment),
            None => data_source,
        })
    }
}

fn bounded_history(history: &[ChatMessage]) -> &[ChatMessage] {
    let skip = history.len().saturating_sub(MAX_HISTORY_MESSAGES);
    &history[skip..]
}
