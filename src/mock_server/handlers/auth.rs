//! OAuth token endpoint handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// Form body of a token request.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[allow(dead_code)] // Sent by clients, not checked by the mock
    pub redirect_uri: Option<String>,
}

/// POST /oauth/token
pub async fn issue_token(
    State(state): State<Arc<RwLock<MockState>>>,
    Form(request): Form<TokenRequest>,
) -> Response {
    let mut state = state.write().await;
    state.record_request("POST", "/oauth/token", None);

    if request.grant_type != "client_credentials" {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "unsupported_grant_type" })),
        )
            .into_response();
    }

    if let Some((ref id, ref secret)) = state.client_credentials {
        if *id != request.client_id || *secret != request.client_secret {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "invalid_client",
                    "error_description": "Client authentication failed"
                })),
            )
                .into_response();
        }
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "access_token": state.issued_token,
            "token_type": "bearer",
            "expires_in": 5400,
            "created_at": chrono::Utc::now().timestamp()
        })),
    )
        .into_response()
}
