use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::application::{Credential, CredentialProvider};
use crate::domain::DomainError;

/// Instance metadata token endpoint on Azure VMs.
pub const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
const IMDS_API_VERSION: &str = "2018-02-01";
const APP_SERVICE_API_VERSION: &str = "2019-08-01";
/// Token audience for Azure OpenAI.
pub const COGNITIVE_SERVICES_RESOURCE: &str = "https://cognitiveservices.azure.com";

const IDENTITY_ENDPOINT: &str = "IDENTITY_ENDPOINT";
const IDENTITY_HEADER: &str = "IDENTITY_HEADER";
const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";

/// Refresh this long before the token expires.
const REFRESH_BUFFER_SECS: i64 = 300;

/// Where the host exposes its managed identity.
#[derive(Clone)]
enum IdentitySource {
    /// Azure VM / VMSS instance metadata service.
    Imds { endpoint: String },
    /// App Service, Functions and Container Apps local identity endpoint.
    AppService { endpoint: String, header: SecretString },
}

#[derive(Clone)]
pub struct ManagedIdentityConfig {
    source: IdentitySource,
    resource: String,
    client_id: Option<String>,
    timeout: Duration,
}

impl Default for ManagedIdentityConfig {
    fn default() -> Self {
        Self {
            source: IdentitySource::Imds {
                endpoint: IMDS_TOKEN_ENDPOINT.to_string(),
            },
            resource: COGNITIVE_SERVICES_RESOURCE.to_string(),
            client_id: None,
            timeout: Duration::from_secs(2),
        }
    }
}

impl ManagedIdentityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect the identity endpoint from the environment:
    /// `IDENTITY_ENDPOINT` + `IDENTITY_HEADER` select the App Service endpoint,
    /// otherwise IMDS is used. `AZURE_CLIENT_ID` selects a user-assigned identity.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let (Ok(endpoint), Ok(header)) =
            (std::env::var(IDENTITY_ENDPOINT), std::env::var(IDENTITY_HEADER))
        {
            config = config.app_service(endpoint, header);
        }
        if let Ok(client_id) = std::env::var(AZURE_CLIENT_ID) {
            if !client_id.is_empty() {
                config.client_id = Some(client_id);
            }
        }
        config
    }

    pub fn imds(mut self, endpoint: impl Into<String>) -> Self {
        self.source = IdentitySource::Imds {
            endpoint: endpoint.into(),
        };
        self
    }

    pub fn app_service(mut self, endpoint: impl Into<String>, header: impl Into<String>) -> Self {
        self.source = IdentitySource::AppService {
            endpoint: endpoint.into(),
            header: SecretString::new(header.into()),
        };
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn source_name(&self) -> &'static str {
        match self.source {
            IdentitySource::Imds { .. } => "imds",
            IdentitySource::AppService { .. } => "app-service",
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Seconds since the epoch. IMDS sends it as a string, some hosts as a number.
    expires_on: serde_json::Value,
}

struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

/// Acquires Entra ID bearer tokens from the host's managed identity endpoint.
///
/// Tokens are cached and refreshed five minutes before they expire.
pub struct ManagedIdentityCredentialProvider {
    config: ManagedIdentityConfig,
    http_client: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl ManagedIdentityCredentialProvider {
    pub fn new(config: ManagedIdentityConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
            cached: RwLock::new(None),
        }
    }

    pub fn from_env() -> Self {
        Self::new(ManagedIdentityConfig::from_env())
    }

    fn cached_token(&self) -> Option<SecretString> {
        let cache = self.cached.read();
        let cached = cache.as_ref()?;
        let refresh_at = cached.expires_at - chrono::Duration::seconds(REFRESH_BUFFER_SECS);
        if Utc::now() < refresh_at {
            Some(cached.token.clone())
        } else {
            None
        }
    }

    async fn fetch_token(&self) -> Result<CachedToken, DomainError> {
        let mut query = vec![("resource", self.config.resource.as_str())];
        if let Some(client_id) = self.config.client_id.as_deref() {
            query.push(("client_id", client_id));
        }

        let request = match &self.config.source {
            IdentitySource::Imds { endpoint } => {
                query.push(("api-version", IMDS_API_VERSION));
                self.http_client
                    .get(endpoint)
                    .header("Metadata", "true")
                    .query(&query)
            }
            IdentitySource::AppService { endpoint, header } => {
                query.push(("api-version", APP_SERVICE_API_VERSION));
                self.http_client
                    .get(endpoint)
                    .header("X-IDENTITY-HEADER", header.expose_secret().as_str())
                    .query(&query)
            }
        };

        let response = request.send().await.map_err(|e| {
            DomainError::authentication(format!(
                "managed identity endpoint ({}) not reachable: {e}",
                self.config.source_name()
            ))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(DomainError::authentication(format!(
                "managed identity endpoint ({}) returned {status}",
                self.config.source_name()
            )));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            DomainError::authentication(format!("invalid managed identity token response: {e}"))
        })?;

        let expires_at = parse_expires_on(&body.expires_on).ok_or_else(|| {
            DomainError::authentication(format!(
                "invalid expires_on in token response: {}",
                body.expires_on
            ))
        })?;

        Ok(CachedToken {
            token: SecretString::new(body.access_token),
            expires_at,
        })
    }
}

fn parse_expires_on(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        serde_json::Value::Number(n) => n.as_i64()?,
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    Utc.timestamp_opt(secs, 0).single()
}

#[async_trait]
impl CredentialProvider for ManagedIdentityCredentialProvider {
    async fn credential(&self) -> Result<Credential, DomainError> {
        if let Some(token) = self.cached_token() {
            trace!("Using cached managed identity token");
            return Ok(Credential::Bearer(token));
        }

        let fresh = self.fetch_token().await?;
        debug!(
            "Acquired managed identity token from {} (expires {})",
            self.config.source_name(),
            fresh.expires_at
        );

        let token = fresh.token.clone();
        *self.cached.write() = Some(fresh);
        Ok(Credential::Bearer(token))
    }

    fn name(&self) -> &str {
        "managed-identity"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_string_and_numeric_expiry() {
        let from_string = parse_expires_on(&json!("1700000000")).unwrap();
        let from_number = parse_expires_on(&json!(1700000000)).unwrap();
        assert_eq!(from_string, from_number);
        assert_eq!(from_string.timestamp(), 1_700_000_000);
    }

    #[test]
    fn rejects_garbage_expiry() {
        assert!(parse_expires_on(&json!("soon")).is_none());
        assert!(parse_expires_on(&json!(null)).is_none());
    }

    #[test]
    fn default_targets_imds_for_cognitive_services() {
        let config = ManagedIdentityConfig::new();
        assert_eq!(config.source_name(), "imds");
        assert_eq!(config.resource, COGNITIVE_SERVICES_RESOURCE);
    }

    #[test]
    fn expired_cache_is_ignored() {
        let provider = ManagedIdentityCredentialProvider::new(ManagedIdentityConfig::new());
        *provider.cached.write() = Some(CachedToken {
            token: SecretString::new("old".to_string()),
            expires_at: Utc::now() + chrono::Duration::seconds(60),
        });
        assert!(provider.cached_token().is_none());

        *provider.cached.write() = Some(CachedToken {
            token: SecretString::new("fresh".to_string()),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        });
        assert!(provider.cached_token().is_some());
    }
}
