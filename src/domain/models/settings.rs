use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an AI assistant that helps people find information.";

/// Endpoint and deployment settings for the completion service and the search index
/// it grounds against.
///
/// Field names on the wire match the keys used in settings files and environment
/// variables (`OpenAIEndpoint`, `SearchIndexName`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "OpenAIEndpoint", default)]
    openai_endpoint: Option<String>,

    #[serde(rename = "OpenAIGptDeployment", default)]
    gpt_deployment: Option<String>,

    #[serde(rename = "OpenAIEmbeddingDeployment", default)]
    embedding_deployment: Option<String>,

    #[serde(rename = "SystemPrompt", default = "default_system_prompt")]
    system_prompt: Option<String>,

    #[serde(rename = "SearchServiceUrl", default)]
    search_service_url: Option<String>,

    #[serde(rename = "SearchIndexName", default)]
    search_index_name: Option<String>,
}

fn default_system_prompt() -> Option<String> {
    Some(DEFAULT_SYSTEM_PROMPT.to_string())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_endpoint: None,
            gpt_deployment: None,
            embedding_deployment: None,
            system_prompt: default_system_prompt(),
            search_service_url: None,
            search_index_name: None,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings with every field unset, including the system prompt. Used as the
    /// starting point for overlays.
    pub fn empty() -> Self {
        Self {
            system_prompt: None,
            ..Self::default()
        }
    }

    pub fn with_openai_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.openai_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_gpt_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.gpt_deployment = Some(deployment.into());
        self
    }

    pub fn with_embedding_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.embedding_deployment = Some(deployment.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn without_system_prompt(mut self) -> Self {
        self.system_prompt = None;
        self
    }

    pub fn with_search_service_url(mut self, url: impl Into<String>) -> Self {
        self.search_service_url = Some(url.into());
        self
    }

    pub fn with_search_index_name(mut self, name: impl Into<String>) -> Self {
        self.search_index_name = Some(name.into());
        self
    }

    /// Overlay every field set in `other` on top of `self`.
    pub fn merge(mut self, other: Settings) -> Self {
        if other.openai_endpoint.is_some() {
            self.openai_endpoint = other.openai_endpoint;
        }
        if other.gpt_deployment.is_some() {
            self.gpt_deployment = other.gpt_deployment;
        }
        if other.embedding_deployment.is_some() {
            self.embedding_deployment = other.embedding_deployment;
        }
        if other.system_prompt.is_some() {
            self.system_prompt = other.system_prompt;
        }
        if other.search_service_url.is_some() {
            self.search_service_url = other.search_service_url;
        }
        if other.search_index_name.is_some() {
            self.search_index_name = other.search_index_name;
        }
        self
    }

    pub fn openai_endpoint(&self) -> Option<&str> {
        non_empty(&self.openai_endpoint)
    }

    pub fn gpt_deployment(&self) -> Option<&str> {
        non_empty(&self.gpt_deployment)
    }

    pub fn embedding_deployment(&self) -> Option<&str> {
        non_empty(&self.embedding_deployment)
    }

    pub fn system_prompt(&self) -> Option<&str> {
        non_empty(&self.system_prompt)
    }

    pub fn search_service_url(&self) -> Option<&str> {
        non_empty(&self.search_service_url)
    }

    pub fn search_index_name(&self) -> Option<&str> {
        non_empty(&self.search_index_name)
    }

    /// Check the fields a completion call cannot do without.
    ///
    /// Returns the first missing field as a configuration error.
    pub fn validate(&self) -> Result<(), DomainError> {
        require(self.openai_endpoint(), "OpenAIEndpoint")?;
        require(self.gpt_deployment(), "OpenAIGptDeployment")?;
        require(self.search_service_url(), "SearchServiceUrl")?;
        require(self.search_index_name(), "SearchIndexName")?;
        Ok(())
    }
}

/// The configured value as written, or `None` when it is unset or blank.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn require<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, DomainError> {
    value.ok_or_else(|| DomainError::configuration(format!("{name} is not set")))
}
