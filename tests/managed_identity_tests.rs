//! Managed identity token acquisition against a local stand-in for the identity endpoint.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ragchat::{CredentialProvider, ManagedIdentityConfig, ManagedIdentityCredentialProvider};

const TOKEN_PATH: &str = "/metadata/identity/oauth2/token";

fn expires_in(secs: i64) -> String {
    (chrono::Utc::now().timestamp() + secs).to_string()
}

#[tokio::test]
async fn test_imds_token_is_fetched_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TOKEN_PATH))
        .and(header("Metadata", "true"))
        .and(query_param("api-version", "2018-02-01"))
        .and(query_param("resource", "https://cognitiveservices.azure.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "imds-token",
            "expires_on": expires_in(3600),
            "resource": "https://cognitiveservices.azure.com",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ManagedIdentityCredentialProvider::new(
        ManagedIdentityConfig::new().imds(format!("{}{}", server.uri(), TOKEN_PATH)),
    );

    let first = provider.credential().await.unwrap();
    let second = provider.credential().await.unwrap();

    assert_eq!(first.header(), ("Authorization", "Bearer imds-token".to_string()));
    assert_eq!(second.header(), first.header());
}

#[tokio::test]
async fn test_nearly_expired_token_is_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "short-lived",
            "expires_on": expires_in(60)
        })))
        .expect(2)
        .mount(&server)
        .await;

    let provider = ManagedIdentityCredentialProvider::new(
        ManagedIdentityConfig::new().imds(format!("{}{}", server.uri(), TOKEN_PATH)),
    );

    provider.credential().await.unwrap();
    provider.credential().await.unwrap();
}

#[tokio::test]
async fn test_app_service_endpoint_uses_identity_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/msi/token"))
        .and(header("X-IDENTITY-HEADER", "local-secret"))
        .and(query_param("api-version", "2019-08-01"))
        .and(query_param("client_id", "11111111-2222-3333-4444-555555555555"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "app-service-token",
            "expires_on": expires_in(3600).parse::<i64>().unwrap()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ManagedIdentityCredentialProvider::new(
        ManagedIdentityConfig::new()
            .app_service(format!("{}/msi/token", server.uri()), "local-secret")
            .client_id("11111111-2222-3333-4444-555555555555"),
    );

    let credential = provider.credential().await.unwrap();

    assert_eq!(
        credential.header(),
        ("Authorization", "Bearer app-service-token".to_string())
    );
}

#[tokio::test]
async fn test_endpoint_error_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Identity not found"))
        .mount(&server)
        .await;

    let provider = ManagedIdentityCredentialProvider::new(
        ManagedIdentityConfig::new().imds(format!("{}{}", server.uri(), TOKEN_PATH)),
    );

    let err = provider.credential().await.unwrap_err();

    assert!(err.is_authentication());
    assert!(err.to_string().contains("400"));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_authentication_error() {
    let provider = ManagedIdentityCredentialProvider::new(
        ManagedIdentityConfig::new()
            .imds("http://127.0.0.1:9/metadata/identity/oauth2/token")
            .timeout(Duration::from_millis(500)),
    );

    let err = provider.credential().await.unwrap_err();

    assert!(err.is_authentication());
}
