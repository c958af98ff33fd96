//! OAuth2 client-credentials token exchange.
//!
//! Procore data-connection apps authenticate with their own client id and
//! secret. The token endpoint answers with a bearer token that stays valid
//! for the lifetime of the process; nothing here caches or refreshes it.

use std::env;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::client::{error_message_from_body, parse_base_url, ClientConfig};
use crate::error::{ProcoreError, Result};

/// Redirect URI Procore expects for out-of-band client-credentials apps.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

const TOKEN_PATH: &str = "oauth/token";

/// App credentials for the client-credentials grant.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read credentials from `CLIENT_ID` and `CLIENT_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcoreError::ConfigMissing`] if either variable is unset.
    pub fn from_env() -> Result<Self> {
        let client_id = env::var("CLIENT_ID").map_err(|_| {
            ProcoreError::ConfigMissing("CLIENT_ID environment variable not set".to_string())
        })?;
        let client_secret = env::var("CLIENT_SECRET").map_err(|_| {
            ProcoreError::ConfigMissing("CLIENT_SECRET environment variable not set".to_string())
        })?;
        Ok(Self::new(client_id, client_secret))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

/// An opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token, as sent after `Bearer `.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Exchanges [`Credentials`] for an [`AccessToken`].
#[derive(Debug, Clone)]
pub struct TokenProvider {
    http: Client,
    token_url: Url,
}

impl TokenProvider {
    /// Create a provider for the OAuth server in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OAuth URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let token_url = parse_base_url(&config.oauth_url)?.join(TOKEN_PATH)?;
        Ok(Self {
            http: config.http_client()?,
            token_url,
        })
    }

    /// The full token endpoint URL.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Perform one client-credentials exchange.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`ProcoreError::Auth`]: empty
    /// credentials, transport errors, error statuses, a non-JSON body, or a
    /// body without an `access_token` string.
    #[tracing::instrument(skip(self, credentials), fields(token_url = %self.token_url))]
    pub async fn exchange(&self, credentials: &Credentials) -> Result<AccessToken> {
        if credentials.client_id.is_empty() || credentials.client_secret.is_empty() {
            return Err(ProcoreError::Auth(
                "client_id and client_secret must not be empty".to_string(),
            ));
        }

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id()),
            ("client_secret", credentials.client_secret()),
            ("redirect_uri", OOB_REDIRECT_URI),
        ];

        let response = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| ProcoreError::Auth(format!("token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProcoreError::Auth(format!("failed to read token response: {e}")))?;

        if !status.is_success() {
            let message =
                error_message_from_body(&body).unwrap_or_else(|| format!("HTTP {status}"));
            return Err(ProcoreError::Auth(format!(
                "token endpoint returned {}: {message}",
                status.as_u16()
            )));
        }

        let token = parse_token_response(&body)?;
        tracing::debug!("obtained access token");
        Ok(token)
    }
}

fn parse_token_response(body: &[u8]) -> Result<AccessToken> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ProcoreError::Auth(format!("token response is not JSON: {e}")))?;

    value
        .get("access_token")
        .and_then(Value::as_str)
        .map(AccessToken::new)
        .ok_or_else(|| {
            ProcoreError::Auth("token response has no access_token field".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_response() {
        let token = parse_token_response(br#"{"access_token":"abc","token_type":"bearer"}"#)
            .unwrap();
        assert_eq!(token, AccessToken::new("abc"));
    }

    #[test]
    fn test_parse_token_response_missing_field() {
        let err = parse_token_response(br#"{"token_type":"bearer"}"#).unwrap_err();
        assert!(matches!(err, ProcoreError::Auth(_)));

        let err = parse_token_response(br#"{"access_token":42}"#).unwrap_err();
        assert!(matches!(err, ProcoreError::Auth(_)));

        let err = parse_token_response(b"<html>").unwrap_err();
        assert!(matches!(err, ProcoreError::Auth(_)));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials::new("my-id", "my-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("my-id"));
        assert!(!debug.contains("my-secret"));

        let token = AccessToken::new("t0ken");
        assert!(!format!("{:?}", token).contains("t0ken"));
    }

    #[test]
    fn test_token_url_from_config() {
        let config = ClientConfig::with_base_urls("https://login.example.com", "https://api.example.com");
        let provider = TokenProvider::new(&config).unwrap();
        assert_eq!(
            provider.token_url().as_str(),
            "https://login.example.com/oauth/token"
        );
    }

    #[tokio::test]
    async fn test_exchange_rejects_empty_credentials() {
        let provider = TokenProvider::new(&ClientConfig::default()).unwrap();
        let err = provider
            .exchange(&Credentials::new("", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcoreError::Auth(_)));
    }
}
