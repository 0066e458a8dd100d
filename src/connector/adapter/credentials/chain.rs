use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use super::{EnvCredentialProvider, ManagedIdentityCredentialProvider};
use crate::application::{Credential, CredentialProvider};
use crate::domain::DomainError;

/// Tries each provider in order and returns the first credential obtained.
pub struct ChainCredentialProvider {
    providers: Vec<Arc<dyn CredentialProvider>>,
}

impl ChainCredentialProvider {
    pub fn with_providers(providers: Vec<Arc<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }

    /// Environment variables, then the host's managed identity.
    pub fn default_chain() -> Self {
        Self::with_providers(vec![
            Arc::new(EnvCredentialProvider::new()),
            Arc::new(ManagedIdentityCredentialProvider::from_env()),
        ])
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

#[async_trait]
impl CredentialProvider for ChainCredentialProvider {
    async fn credential(&self) -> Result<Credential, DomainError> {
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            trace!("Trying credential provider: {}", provider.name());
            match provider.credential().await {
                Ok(credential) => {
                    debug!("Credential resolved by provider: {}", provider.name());
                    return Ok(credential);
                }
                Err(e) => {
                    trace!("Provider {} failed: {}", provider.name(), e);
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        if failures.is_empty() {
            return Err(DomainError::authentication("no credential providers configured"));
        }
        Err(DomainError::authentication(format!(
            "no credential available ({})",
            failures.join("; ")
        )))
    }

    fn name(&self) -> &str {
        "chain"
    }
}

impl std::fmt::Debug for ChainCredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainCredentialProvider")
            .field("providers", &self.provider_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::StaticCredentialProvider;

    struct FailingProvider;

    #[async_trait]
    impl CredentialProvider for FailingProvider {
        async fn credential(&self) -> Result<Credential, DomainError> {
            Err(DomainError::authentication("nothing here"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn uses_first_successful_provider() {
        let chain = ChainCredentialProvider::with_providers(vec![
            Arc::new(FailingProvider),
            Arc::new(StaticCredentialProvider::new(Credential::bearer("t"))),
        ]);

        let credential = chain.credential().await.unwrap();

        assert_eq!(credential.kind(), "bearer");
    }

    #[tokio::test]
    async fn reports_every_failure() {
        let chain = ChainCredentialProvider::with_providers(vec![
            Arc::new(FailingProvider),
            Arc::new(FailingProvider),
        ]);

        let err = chain.credential().await.unwrap_err();

        assert!(err.is_authentication());
        assert_eq!(err.to_string().matches("failing: ").count(), 2);
    }

    #[tokio::test]
    async fn empty_chain_fails() {
        let chain = ChainCredentialProvider::with_providers(vec![]);
        assert!(chain.credential().await.is_err());
    }

    #[test]
    fn default_chain_order() {
        let chain = ChainCredentialProvider::default_chain();
        assert_eq!(chain.provider_names(), vec!["environment", "managed-identity"]);
    }
}
