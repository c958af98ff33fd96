//! Authenticated HTTP transport for the Procore REST API.
//!
//! [`ProcoreClient`] only sends requests and classifies error statuses.
//! Reading JSON bodies is left to the callers in `pagination`,
//! `attachments` and the model `Get` impls.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::{AccessToken, Credentials, TokenProvider};
use crate::error::{ProcoreError, Result};

const DEFAULT_OAUTH_URL: &str = "https://login.procore.com";
const DEFAULT_API_URL: &str = "https://api.procore.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const USER_AGENT: &str = concat!("procore-api/", env!("CARGO_PKG_VERSION"));

/// Header that scopes a request to one company.
pub const COMPANY_HEADER: &str = "Procore-Company-Id";

/// Where to reach Procore and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the OAuth server (token endpoint is `oauth/token` below it).
    pub oauth_url: String,
    /// Base URL of the REST API (paths like `rest/v1.1/projects` are joined on).
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            oauth_url: DEFAULT_OAUTH_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Build a config from environment variables.
    ///
    /// `PROCORE_OAUTH_URL` and `PROCORE_API_URL` override the production
    /// hosts; both are optional.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            oauth_url: env::var("PROCORE_OAUTH_URL").unwrap_or(defaults.oauth_url),
            api_url: env::var("PROCORE_API_URL").unwrap_or(defaults.api_url),
            timeout: defaults.timeout,
        }
    }

    /// Config pointing at explicit hosts, e.g. a sandbox or a mock server.
    pub fn with_base_urls(oauth_url: &str, api_url: &str) -> Self {
        Self {
            oauth_url: oauth_url.to_string(),
            api_url: api_url.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn http_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(self.timeout)
            .build()
            .map_err(ProcoreError::HttpError)
    }
}

/// Parse a base URL, making sure relative joins land below it.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let base_url_str = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Ok(Url::parse(&base_url_str)?)
}

/// Authenticated Procore REST client.
///
/// Every request carries the bearer token the client was built with.
/// Entity-specific operations are implemented via the `Get` and `List`
/// traits on model types.
///
/// Clones share the connection pool and the token.
///
/// # Example
///
/// ```no_run
/// use procore_api::{ClientConfig, Credentials, ProcoreClient};
///
/// # async fn example() -> procore_api::Result<()> {
/// // Exchange credentials from the environment for a token
/// let client = ProcoreClient::from_env().await?;
///
/// // Or with explicit credentials and hosts
/// let credentials = Credentials::new("client-id", "client-secret");
/// let client = ProcoreClient::connect(&credentials, &ClientConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProcoreClient {
    http: Client,
    base_url: Arc<Url>,
    token: AccessToken,
}

impl std::fmt::Debug for ProcoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcoreClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ProcoreClient {
    /// Create a client that sends `token` to the API in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API base URL is invalid.
    pub fn new(token: AccessToken, config: &ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.api_url)?;

        Ok(Self {
            http: config.http_client()?,
            base_url: Arc::new(base_url),
            token,
        })
    }

    /// Exchange `credentials` for a token, then build a client with it.
    ///
    /// # Errors
    ///
    /// Returns [`ProcoreError::Auth`] if the token exchange fails; no
    /// client is produced in that case.
    pub async fn connect(credentials: &Credentials, config: &ClientConfig) -> Result<Self> {
        let token = TokenProvider::new(config)?.exchange(credentials).await?;
        Self::new(token, config)
    }

    /// Connect using `CLIENT_ID`/`CLIENT_SECRET` and [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are not set or the exchange fails.
    pub async fn from_env() -> Result<Self> {
        let credentials = Credentials::from_env()?;
        Self::connect(&credentials, &ClientConfig::from_env()).await
    }

    /// API base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path`, optionally scoped to a company.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str, company_id: Option<u64>) -> Result<Response> {
        let request = self.request(Method::GET, path, company_id)?;
        Self::send(request).await
    }

    /// GET `path` with `query` appended as URL parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        company_id: Option<u64>,
        query: &Q,
    ) -> Result<Response> {
        let request = self.request(Method::GET, path, company_id)?.query(query);
        Self::send(request).await
    }

    /// Make a PATCH request with a multipart body.
    #[tracing::instrument(skip(self, form))]
    pub async fn patch_multipart(
        &self,
        path: &str,
        company_id: Option<u64>,
        form: Form,
    ) -> Result<Response> {
        let request = self.request(Method::PATCH, path, company_id)?.multipart(form);
        Self::send(request).await
    }

    /// POST `body` as JSON.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        company_id: Option<u64>,
        body: &B,
    ) -> Result<Response> {
        let request = self.request(Method::POST, path, company_id)?.json(body);
        Self::send(request).await
    }

    fn request(&self, method: Method, path: &str, company_id: Option<u64>) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(self.token.as_str())
            .header(ACCEPT, "application/json");

        if let Some(company_id) = company_id {
            request = request.header(COMPANY_HEADER, company_id.to_string());
        }

        Ok(request)
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ProcoreError::HttpError)?;
        Self::check_response(response).await
    }

    /// Pass 2xx responses through; turn anything else into an error.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Reported only, never retried
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ProcoreError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = match response.bytes().await {
            Ok(body) => error_message_from_body(&body).unwrap_or_else(|| format!("HTTP {status}")),
            Err(_) => format!("HTTP {status}"),
        };
        Err(ProcoreError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }
}

/// Read a response body and parse it as JSON.
pub(crate) async fn read_json(response: Response) -> Result<Value> {
    let body = response.bytes().await.map_err(ProcoreError::HttpError)?;
    Ok(serde_json::from_slice(&body)?)
}

/// Extract a human-readable message from an error body.
///
/// Procore uses `message`, `error` or `errors` depending on the endpoint;
/// non-JSON bodies are returned as-is.
pub(crate) fn error_message_from_body(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    if text.trim().is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(&text) {
        for key in ["message", "error", "errors"] {
            match json.get(key) {
                Some(Value::String(msg)) => return Some(msg.clone()),
                Some(other @ (Value::Object(_) | Value::Array(_))) => {
                    return Some(other.to_string())
                }
                _ => {}
            }
        }
    }

    Some(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(api_url: &str) -> ProcoreClient {
        ProcoreClient::new(
            AccessToken::new("test-token"),
            &ClientConfig::with_base_urls("https://login.procore.com", api_url),
        )
        .unwrap()
    }

    #[test]
    fn test_client_debug() {
        let client = test_client("https://api.procore.com");
        let debug = format!("{client:?}");
        assert!(debug.contains("ProcoreClient"));
        assert!(debug.contains("base_url"));
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = test_client("https://api.procore.com");
        let client2 = test_client("https://api.procore.com/");
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
        assert_eq!(
            client1.base_url().join("rest/v1.0/companies").unwrap().as_str(),
            "https://api.procore.com/rest/v1.0/companies"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ProcoreClient::new(
            AccessToken::new("t"),
            &ClientConfig::with_base_urls("https://login.procore.com", "not a url"),
        );
        assert!(matches!(result, Err(ProcoreError::UrlError(_))));
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            error_message_from_body(br#"{"message":"Not allowed"}"#).as_deref(),
            Some("Not allowed")
        );
        assert_eq!(
            error_message_from_body(br#"{"errors":{"name":["is taken"]}}"#).as_deref(),
            Some(r#"{"name":["is taken"]}"#)
        );
        assert_eq!(
            error_message_from_body(b"Bad Gateway").as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(error_message_from_body(b"  "), None);
    }
}
