//! Credential providers for the completion endpoint.
//!
//! [`ChainCredentialProvider::default_chain`] resolves the process's ambient identity:
//! explicit environment credentials first, then the managed identity of the host.

mod chain;
mod env;
mod managed_identity;
mod static_credential;

pub use chain::ChainCredentialProvider;
pub use env::{EnvCredentialProvider, AZURE_OPENAI_AD_TOKEN, AZURE_OPENAI_API_KEY};
pub use managed_identity::{ManagedIdentityConfig, ManagedIdentityCredentialProvider};
pub use static_credential::StaticCredentialProvider;
