use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::{CompletionClient, GetChatCompletionUseCase};
use crate::connector::adapter::{AzureOpenAiClient, ChainCredentialProvider, MockCompletionClient};
use crate::connector::config::SettingsLoader;
use crate::domain::Settings;

pub struct ContainerConfig {
    /// JSON settings file; environment variables override its values. When unset,
    /// `appsettings.json` in the working directory is used if present.
    pub settings_file: Option<String>,
    /// Answer from the offline mock client instead of the hosted service.
    pub mock: bool,
    pub timeout_secs: u64,
}

/// Wires settings, the completion client and the chat use case once at startup.
pub struct Container {
    chat_use_case: Arc<GetChatCompletionUseCase>,
}

impl Container {
    /// Fails when required settings are missing; nothing can be served without them.
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let loader = match config.settings_file.as_deref() {
            Some(path) => SettingsLoader::new().with_file(path),
            None => SettingsLoader::new().with_default_file_in(
                std::env::current_dir().context("Failed to resolve working directory")?,
            ),
        };
        let settings = loader.load().context("Failed to load settings")?;
        settings.validate()?;

        let completion_client: Arc<dyn CompletionClient> = if config.mock {
            debug!("Using mock completion client");
            Arc::new(MockCompletionClient::new())
        } else {
            let credentials = ChainCredentialProvider::default_chain();
            debug!(
                "Using Azure OpenAI completion client with credential chain {:?}",
                credentials.provider_names()
            );
            Arc::new(
                AzureOpenAiClient::from_settings(&settings, Arc::new(credentials))?
                    .with_timeout(Duration::from_secs(config.timeout_secs)),
            )
        };

        Self::with_client(settings, completion_client)
    }

    pub fn with_client(
        settings: Settings,
        completion_client: Arc<dyn CompletionClient>,
    ) -> Result<Self> {
        let chat_use_case = GetChatCompletionUseCase::new(settings, completion_client)?;
        Ok(Self {
            chat_use_case: Arc::new(chat_use_case),
        })
    }

    pub fn chat_use_case(&self) -> Arc<GetChatCompletionUseCase> {
        self.chat_use_case.clone()
    }

    pub fn settings(&self) -> &Settings {
        self.chat_use_case.settings()
    }
}
