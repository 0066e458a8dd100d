use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::DomainError;

/// A credential for the completion endpoint.
#[derive(Clone)]
pub enum Credential {
    /// Sent as the `api-key` header.
    ApiKey(SecretString),
    /// Sent as `Authorization: Bearer ...`.
    Bearer(SecretString),
}

impl Credential {
    pub fn api_key(key: impl Into<String>) -> Self {
        Credential::ApiKey(SecretString::new(key.into()))
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Credential::Bearer(SecretString::new(token.into()))
    }

    /// Header name and value to attach to a request.
    ///
    /// Note: This exposes the secret. Avoid logging the result.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Credential::ApiKey(key) => ("api-key", key.expose_secret().clone()),
            Credential::Bearer(token) => {
                ("Authorization", format!("Bearer {}", token.expose_secret()))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credential::ApiKey(_) => "api-key",
            Credential::Bearer(_) => "bearer",
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({}, [REDACTED])", self.kind())
    }
}

/// Resolves a credential from the process's ambient identity.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credential(&self) -> Result<Credential, DomainError>;

    fn name(&self) -> &str;
}
