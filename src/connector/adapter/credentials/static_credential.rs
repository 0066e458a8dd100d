use async_trait::async_trait;

use crate::application::{Credential, CredentialProvider};
use crate::domain::DomainError;

/// Always returns the credential it was built with.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credential(&self) -> Result<Credential, DomainError> {
        Ok(self.credential.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
