use anyhow::Result;

use crate::{semantic_configuration_name, Settings};

use super::super::Container;

pub struct SettingsController<'a> {
    container: &'a Container,
}

impl<'a> SettingsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn show(&self) -> Result<String> {
        Ok(self.format_settings(self.container.settings()))
    }

    fn format_settings(&self, settings: &Settings) -> String {
        let unset = "(not set)";
        let index = settings.search_index_name().unwrap_or(unset);
        let semantic = settings
            .search_index_name()
            .map(semantic_configuration_name)
            .unwrap_or_else(|| unset.to_string());

        format!(
            "ragchat Settings\n================\nOpenAI Endpoint:      {}\nChat Deployment:      {}\nEmbedding Deployment: {}\nSearch Service:       {}\nSearch Index:         {}\nSemantic Config:      {}\nSystem Prompt:        {}",
            settings.openai_endpoint().unwrap_or(unset),
            settings.gpt_deployment().unwrap_or(unset),
            settings.embedding_deployment().unwrap_or(unset),
            settings.search_service_url().unwrap_or(unset),
            index,
            semantic,
            settings.system_prompt().unwrap_or(unset),
        )
    }
}
