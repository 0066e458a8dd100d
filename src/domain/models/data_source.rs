use serde::{Deserialize, Serialize};

/// Suffix appended to the index name to form the semantic ranker profile name.
/// Index provisioning creates the profile under exactly this name.
pub const SEMANTIC_CONFIGURATION_SUFFIX: &str = "-semantic-configuration";

pub fn semantic_configuration_name(index_name: &str) -> String {
    format!("{index_name}{SEMANTIC_CONFIGURATION_SUFFIX}")
}

/// How the completion service authenticates against the search index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceAuthentication {
    /// The completion service's own managed identity. No credential leaves this process.
    #[default]
    SystemAssignedManagedIdentity,
}

impl DataSourceAuthentication {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceAuthentication::SystemAssignedManagedIdentity => {
                "system_assigned_managed_identity"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Vector similarity plus keyword matching, re-ranked semantically.
    #[default]
    VectorSemanticHybrid,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::VectorSemanticHybrid => "vector_semantic_hybrid",
        }
    }
}

/// Where query vectors come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vectorizer {
    DeploymentName(String),
}

/// Retrieval configuration attached to a completion request: which search index
/// to ground on and how to query it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    endpoint: String,
    index_name: String,
    authentication: DataSourceAuthentication,
    query_type: QueryType,
    vectorization_source: Option<Vectorizer>,
    semantic_configuration: Option<String>,
}

impl DataSource {
    /// An Azure AI Search source for `index_name`, using hybrid semantic retrieval and
    /// the index's conventional semantic configuration.
    pub fn azure_search(endpoint: impl Into<String>, index_name: impl Into<String>) -> Self {
        let index_name = index_name.into();
        let semantic_configuration = semantic_configuration_name(&index_name);
        Self {
            endpoint: endpoint.into(),
            index_name,
            authentication: DataSourceAuthentication::default(),
            query_type: QueryType::default(),
            vectorization_source: None,
            semantic_configuration: Some(semantic_configuration),
        }
    }

    pub fn with_embedding_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.vectorization_source = Some(Vectorizer::DeploymentName(deployment.into()));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn authentication(&self) -> DataSourceAuthentication {
        self.authentication
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    pub fn vectorization_source(&self) -> Option<&Vectorizer> {
        self.vectorization_source.as_ref()
    }

    pub fn semantic_configuration(&self) -> Option<&str> {
        self.semantic_configuration.as_deref()
    }
}
