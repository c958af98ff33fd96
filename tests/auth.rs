//! Token exchange tests.
//!
//! Uses wiremock to stand in for the Procore OAuth server.

use std::time::Duration;

use procore_api::{
    AccessToken, ClientConfig, Credentials, ProcoreClient, ProcoreError, TokenProvider,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::with_base_urls(&server.uri(), &server.uri())
}

#[tokio::test]
async fn test_exchange_returns_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=my-client"))
        .and(body_string_contains("client_secret=my-secret"))
        .and(body_string_contains(
            "redirect_uri=urn%3Aietf%3Awg%3Aoauth%3A2.0%3Aoob",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "abc",
            "token_type": "bearer",
            "expires_in": 5400
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = TokenProvider::new(&config_for(&mock_server)).unwrap();
    let token = provider
        .exchange(&Credentials::new("my-client", "my-secret"))
        .await
        .unwrap();

    assert_eq!(token, AccessToken::new("abc"));
}

#[tokio::test]
async fn test_exchange_without_access_token_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"token_type": "bearer"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = TokenProvider::new(&config_for(&mock_server)).unwrap();
    let err = provider
        .exchange(&Credentials::new("id", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProcoreError::Auth(_)), "got {err:?}");
}

#[tokio::test]
async fn test_exchange_error_status_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client"
        })))
        .mount(&mock_server)
        .await;

    let provider = TokenProvider::new(&config_for(&mock_server)).unwrap();
    let err = provider
        .exchange(&Credentials::new("id", "wrong"))
        .await
        .unwrap_err();

    match err {
        ProcoreError::Auth(message) => {
            assert!(message.contains("401"), "message: {message}");
            assert!(message.contains("invalid_client"), "message: {message}");
        }
        other => panic!("expected Auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exchange_transport_failure_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access_token": "late"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.timeout = Duration::from_millis(200);

    let provider = TokenProvider::new(&config).unwrap();
    let err = provider
        .exchange(&Credentials::new("id", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProcoreError::Auth(_)), "got {err:?}");
}

#[tokio::test]
async fn test_failed_connect_sends_no_api_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result =
        ProcoreClient::connect(&Credentials::new("id", "secret"), &config_for(&mock_server)).await;
    assert!(matches!(result, Err(ProcoreError::Auth(_))));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/oauth/token");
}
