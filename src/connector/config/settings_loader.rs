use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{DomainError, Settings};

/// Setting keys, shared by settings files and environment variables.
pub const SETTING_KEYS: [&str; 6] = [
    "OpenAIEndpoint",
    "OpenAIGptDeployment",
    "OpenAIEmbeddingDeployment",
    "SystemPrompt",
    "SearchServiceUrl",
    "SearchIndexName",
];

/// Settings file picked up from the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Builds [`Settings`] from defaults, an optional JSON settings file and the
/// environment, each overriding the previous.
///
/// ```text
/// {
///   "OpenAIEndpoint": "https://my-openai.openai.azure.com",
///   "OpenAIGptDeployment": "gpt-4o",
///   "OpenAIEmbeddingDeployment": "text-embedding-3-large",
///   "SearchServiceUrl": "https://my-search.search.windows.net",
///   "SearchIndexName": "docs-v1"
/// }
/// ```
#[derive(Debug)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    use_env: bool,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            use_env: true,
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Use `dir/appsettings.json` when it exists; otherwise leave the file unset.
    pub fn with_default_file_in(mut self, dir: impl AsRef<Path>) -> Self {
        let candidate = dir.as_ref().join(DEFAULT_SETTINGS_FILE);
        if candidate.is_file() {
            self.file = Some(candidate);
        }
        self
    }

    pub fn with_env(mut self, use_env: bool) -> Self {
        self.use_env = use_env;
        self
    }

    /// Load settings without validating them; validation happens where the
    /// settings are consumed.
    pub fn load(&self) -> Result<Settings, DomainError> {
        let mut settings = Settings::default();

        if let Some(path) = &self.file {
            debug!("Loading settings from {}", path.display());
            settings = settings.merge(Self::read_file(path)?);
        }

        if self.use_env {
            settings = settings.merge(Self::read_env(|key| std::env::var(key).ok()));
        }

        Ok(settings)
    }

    fn read_file(path: &Path) -> Result<Settings, DomainError> {
        let text = std::fs::read_to_string(path)?;
        let file_settings: Settings = serde_json::from_str(&text).map_err(|e| {
            DomainError::configuration(format!("invalid settings file {}: {e}", path.display()))
        })?;
        // Deserialization fills in the default prompt; only keep it when the file set one.
        let has_prompt = serde_json::from_str::<serde_json::Value>(&text)
            .map(|v| v.get("SystemPrompt").is_some())
            .unwrap_or(false);
        Ok(if has_prompt {
            file_settings
        } else {
            file_settings.without_system_prompt()
        })
    }

    fn read_env(lookup: impl Fn(&str) -> Option<String>) -> Settings {
        let mut settings = Settings::empty();
        for key in SETTING_KEYS {
            let Some(value) = lookup(key) else { continue };
            settings = match key {
                "OpenAIEndpoint" => settings.with_openai_endpoint(value),
                "OpenAIGptDeployment" => settings.with_gpt_deployment(value),
                "OpenAIEmbeddingDeployment" => settings.with_embedding_deployment(value),
                "SystemPrompt" => settings.with_system_prompt(value),
                "SearchServiceUrl" => settings.with_search_service_url(value),
                "SearchIndexName" => settings.with_search_index_name(value),
                _ => settings,
            };
        }
        settings
    }
}
