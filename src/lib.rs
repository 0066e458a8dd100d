pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    CompletionClient, Credential, CredentialProvider, GetChatCompletionUseCase,
    MAX_HISTORY_MESSAGES,
};

pub use cli::Commands;

pub use connector::{
    AzureOpenAiClient, ChainCredentialProvider, EnvCredentialProvider, ManagedIdentityConfig,
    ManagedIdentityCredentialProvider, MockCompletionClient, SettingsLoader,
    StaticCredentialProvider,
};

pub use domain::{
    semantic_configuration_name, ChatMessage, ChatResponse, Citation, Completion, ContentPart,
    DataSource, DataSourceAuthentication, DomainError, MessageContext, QueryType, Role, Settings,
    Vectorizer, DEFAULT_SYSTEM_PROMPT, SEMANTIC_CONFIGURATION_SUFFIX,
};
