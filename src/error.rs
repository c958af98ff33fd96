//! Error types for Procore API operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during Procore API operations.
#[derive(Debug, Error)]
pub enum ProcoreError {
    /// Configuration is missing or incomplete.
    #[error("Procore configuration required: {0}")]
    ConfigMissing(String),

    /// The client-credentials token exchange failed.
    ///
    /// No authenticated call should be attempted after this error.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// API request failed with a non-success status.
    #[error("Procore API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Response body was valid JSON of the wrong kind.
    #[error("Unexpected response: expected a JSON {expected}, got {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// A local attachment could not be read.
    #[error("Cannot read attachment '{}': {source}", path.display())]
    AttachmentError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl ProcoreError {
    /// True for transport-level failures (DNS, connection, timeout, body read).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::HttpError(_))
    }

    /// True when the body was not JSON or not the expected JSON shape.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Self::ParseError(_) | Self::UnexpectedShape { .. })
    }

    /// The HTTP status code, when the server answered with an error status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => *status_code,
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// True for 401 responses (bad or expired token).
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// True for 403 responses (app lacks permission for the endpoint).
    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }
}

/// Name of a JSON value's kind, for [`ProcoreError::UnexpectedShape`].
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Result type alias for Procore operations.
pub type Result<T> = core::result::Result<T, ProcoreError>;
