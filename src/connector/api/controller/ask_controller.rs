use anyhow::Result;

use crate::ChatMessage;

use super::super::Container;
use super::response_format::format_response;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Answer a single question with no prior conversation.
    pub async fn ask(&self, question: String, json: bool) -> Result<String> {
        let use_case = self.container.chat_use_case();
        let history = vec![ChatMessage::user(question)];
        let response = use_case.execute(&history).await;

        if json {
            return Ok(serde_json::to_string_pretty(&response)?);
        }
        Ok(format_response(&response))
    }
}
