use std::env;

use async_trait::async_trait;

use crate::application::{Credential, CredentialProvider};
use crate::domain::DomainError;

pub const AZURE_OPENAI_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const AZURE_OPENAI_AD_TOKEN: &str = "AZURE_OPENAI_AD_TOKEN";

/// Reads a credential from environment variables at call time.
///
/// - `AZURE_OPENAI_API_KEY`: sent as the `api-key` header
/// - `AZURE_OPENAI_AD_TOKEN`: a pre-acquired Entra ID token, sent as a bearer token
///
/// The API key wins when both are set.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialProvider {
    api_key_var: Option<String>,
    token_var: Option<String>,
}

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vars(api_key_var: impl Into<String>, token_var: impl Into<String>) -> Self {
        Self {
            api_key_var: Some(api_key_var.into()),
            token_var: Some(token_var.into()),
        }
    }

    fn api_key_var(&self) -> &str {
        self.api_key_var.as_deref().unwrap_or(AZURE_OPENAI_API_KEY)
    }

    fn token_var(&self) -> &str {
        self.token_var.as_deref().unwrap_or(AZURE_OPENAI_AD_TOKEN)
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn credential(&self) -> Result<Credential, DomainError> {
        if let Some(key) = read_var(self.api_key_var()) {
            return Ok(Credential::api_key(key));
        }
        if let Some(token) = read_var(self.token_var()) {
            return Ok(Credential::bearer(token));
        }
        Err(DomainError::authentication(format!(
            "neither {} nor {} is set",
            self.api_key_var(),
            self.token_var()
        )))
    }

    fn name(&self) -> &str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn api_key_wins_over_token() {
        env::set_var("RAGCHAT_TEST_KEY_A", "key-a");
        env::set_var("RAGCHAT_TEST_TOKEN_A", "token-a");
        let provider = EnvCredentialProvider::with_vars("RAGCHAT_TEST_KEY_A", "RAGCHAT_TEST_TOKEN_A");

        let credential = provider.credential().await.unwrap();

        assert_eq!(credential.header(), ("api-key", "key-a".to_string()));
    }

    #[tokio::test]
    async fn falls_back_to_bearer_token() {
        env::set_var("RAGCHAT_TEST_TOKEN_B", "token-b");
        let provider = EnvCredentialProvider::with_vars("RAGCHAT_TEST_KEY_B", "RAGCHAT_TEST_TOKEN_B");

        let credential = provider.credential().await.unwrap();

        assert_eq!(
            credential.header(),
            ("Authorization", "Bearer token-b".to_string())
        );
    }

    #[tokio::test]
    async fn missing_vars_is_authentication_error() {
        let provider = EnvCredentialProvider::with_vars("RAGCHAT_TEST_KEY_C", "RAGCHAT_TEST_TOKEN_C");

        let err = provider.credential().await.unwrap_err();

        assert!(err.is_authentication());
        assert!(err.to_string().contains("RAGCHAT_TEST_KEY_C"));
    }
}
