use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{CompletionClient, CredentialProvider};
use crate::domain::{
    ChatMessage, Citation, Completion, ContentPart, DataSource, DomainError, MessageContext,
    Settings, Vectorizer,
};

pub const DEFAULT_API_VERSION: &str = "2024-10-21";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DATA_SOURCE_TYPE: &str = "azure_search";

#[derive(Serialize)]
struct ApiRequest<'a> {
    messages: Vec<ApiMessage>,
    data_sources: Vec<ApiDataSource<'a>>,
}

#[derive(Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ApiDataSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    parameters: ApiSearchParameters<'a>,
}

#[derive(Serialize)]
struct ApiSearchParameters<'a> {
    endpoint: &'a str,
    index_name: &'a str,
    authentication: ApiAuthentication,
    query_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    embedding_dependency: Option<ApiEmbeddingDependency<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic_configuration: Option<&'a str>,
}

#[derive(Serialize)]
struct ApiAuthentication {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ApiEmbeddingDependency<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    deployment_name: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
    context: Option<ApiContext>,
}

#[derive(Deserialize)]
struct ApiContext {
    #[serde(default)]
    citations: Vec<Citation>,
    intent: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    code: Option<String>,
    message: String,
}

/// HTTP client for Azure OpenAI chat completions "on your data": every request
/// carries an Azure AI Search data source so the service retrieves and cites
/// documents while answering.
///
/// Authentication comes from an injected [`CredentialProvider`], resolved once per
/// request.
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    credential_provider: Arc<dyn CredentialProvider>,
    deployment: String,
    /// Full chat completions URL including the api-version query.
    url: String,
}

impl AzureOpenAiClient {
    pub fn new(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        credential_provider: Arc<dyn CredentialProvider>,
    ) -> Self {
        let endpoint: String = endpoint.into();
        let deployment: String = deployment.into();
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            DEFAULT_API_VERSION
        );
        Self {
            client: build_http_client(DEFAULT_TIMEOUT),
            credential_provider,
            deployment,
            url,
        }
    }

    /// Build from the endpoint and chat deployment in `settings`.
    pub fn from_settings(
        settings: &Settings,
        credential_provider: Arc<dyn CredentialProvider>,
    ) -> Result<Self, DomainError> {
        let endpoint = settings
            .openai_endpoint()
            .ok_or_else(|| DomainError::configuration("OpenAIEndpoint is not set"))?;
        let deployment = settings
            .gpt_deployment()
            .ok_or_else(|| DomainError::configuration("OpenAIGptDeployment is not set"))?;
        Ok(Self::new(endpoint, deployment, credential_provider))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request<'a>(messages: &[ChatMessage], data_source: &'a DataSource) -> ApiRequest<'a> {
        let messages = messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role().as_str(),
                content: m.text(),
            })
            .collect();

        let embedding_dependency = data_source.vectorization_source().map(|v| match v {
            Vectorizer::DeploymentName(name) => ApiEmbeddingDependency {
                kind: "deployment_name",
                deployment_name: name,
            },
        });

        ApiRequest {
            messages,
            data_sources: vec![ApiDataSource {
                kind: DATA_SOURCE_TYPE,
                parameters: ApiSearchParameters {
                    endpoint: data_source.endpoint(),
                    index_name: data_source.index_name(),
                    authentication: ApiAuthentication {
                        kind: data_source.authentication().as_str(),
                    },
                    query_type: data_source.query_type().as_str(),
                    embedding_dependency,
                    semantic_configuration: data_source.semantic_configuration(),
                },
            }],
        }
    }

    fn into_completion(response: ApiResponse) -> Completion {
        let Some(choice) = response.choices.into_iter().next() else {
            return Completion::default();
        };
        let message = choice.message;

        let mut content = Vec::new();
        if let Some(text) = message.content.filter(|t| !t.is_empty()) {
            content.push(ContentPart::Text(text));
        }
        if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
            content.push(ContentPart::Refusal(refusal));
        }

        let context = message.context.map(|ctx| MessageContext {
            citations: ctx.citations,
            intent: ctx.intent,
        });

        Completion { content, context }
    }

    fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => match parsed.error.code {
                Some(code) => format!("service returned {status} ({code}): {}", parsed.error.message),
                None => format!("service returned {status}: {}", parsed.error.message),
            },
            Err(_) => format!("service returned {status}"),
        }
    }
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        data_source: &DataSource,
    ) -> Result<Completion, DomainError> {
        let credential = self.credential_provider.credential().await?;
        let (header_name, header_value) = credential.header();

        let request = Self::build_request(messages, data_source);

        debug!(
            "AzureOpenAiClient: POST deployment={} index={} credential={}",
            self.deployment,
            data_source.index_name(),
            credential.kind()
        );

        let response = self
            .client
            .post(&self.url)
            .header(header_name, header_value)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::completion(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AzureOpenAiClient: API returned {status}: {body}");
            return Err(DomainError::completion(Self::describe_error(status, &body)));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| DomainError::invalid_response(format!("failed to parse response: {e}")))?;

        Ok(Self::into_completion(api_response))
    }

    fn name(&self) -> &str {
        "azure-openai"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_carries_search_data_source() {
        let source = DataSource::azure_search("https://search.example.net", "docs-v1")
            .with_embedding_deployment("embed");
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];

        let value = serde_json::to_value(AzureOpenAiClient::build_request(&messages, &source)).unwrap();

        assert_eq!(
            value,
            json!({
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "data_sources": [{
                    "type": "azure_search",
                    "parameters": {
                        "endpoint": "https://search.example.net",
                        "index_name": "docs-v1",
                        "authentication": {"type": "system_assigned_managed_identity"},
                        "query_type": "vector_semantic_hybrid",
                        "embedding_dependency": {"type": "deployment_name", "deployment_name": "embed"},
                        "semantic_configuration": "docs-v1-semantic-configuration"
                    }
                }]
            })
        );
    }

    #[test]
    fn request_omits_missing_embedding_dependency() {
        let source = DataSource::azure_search("https://search.example.net", "docs");
        let value = serde_json::to_value(AzureOpenAiClient::build_request(&[], &source)).unwrap();

        assert!(value["data_sources"][0]["parameters"]
            .get("embedding_dependency")
            .is_none());
    }

    #[test]
    fn assistant_citations_are_not_sent() {
        let source = DataSource::azure_search("https://search.example.net", "docs");
        let messages = vec![ChatMessage::assistant("answer [doc1]")
            .with_citations(vec![Citation::new("Doc", "body")])];

        let value = serde_json::to_value(AzureOpenAiClient::build_request(&messages, &source)).unwrap();

        assert_eq!(
            value["messages"][0],
            json!({"role": "assistant", "content": "answer [doc1]"})
        );
    }

    #[test]
    fn url_includes_deployment_and_api_version() {
        let client = AzureOpenAiClient::new(
            "https://example.openai.azure.com/",
            "gpt-4o",
            Arc::new(crate::connector::adapter::StaticCredentialProvider::new(
                crate::application::Credential::api_key("k"),
            )),
        );
        assert_eq!(
            client.url(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-10-21"
        );
    }

    #[test]
    fn empty_choices_is_degenerate_success() {
        let completion = AzureOpenAiClient::into_completion(ApiResponse { choices: vec![] });
        assert!(completion.content.is_empty());
        assert!(completion.context.is_none());
    }

    #[test]
    fn describe_error_uses_service_message() {
        let body = r#"{"error":{"code":"429","message":"Rate limit reached"}}"#;
        let text = AzureOpenAiClient::describe_error(reqwest::StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(text, "service returned 429 Too Many Requests (429): Rate limit reached");

        let text = AzureOpenAiClient::describe_error(reqwest::StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(text, "service returned 502 Bad Gateway");
    }
}
