//! HTTP request handlers for the mock server.

pub mod auth;
pub mod companies;
pub mod direct_costs;
pub mod projects;

pub use auth::*;
pub use companies::*;
pub use direct_costs::*;
pub use projects::*;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::mock_server::state::MockState;
use crate::COMPANY_HEADER;

/// Pagination query parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(100)
    }
}

/// JSON error body in the shape Procore uses.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "errors": message }))).into_response()
}

/// Reject requests without the expected bearer token.
pub fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    if !state.require_token {
        return Ok(());
    }

    let expected = format!("Bearer {}", state.issued_token);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(error_response(
            StatusCode::UNAUTHORIZED,
            "The access token is invalid",
        )),
    }
}

/// Read the `Procore-Company-Id` header.
pub fn company_header(headers: &HeaderMap) -> Result<u64, Response> {
    headers
        .get(COMPANY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "Procore-Company-Id header is required",
            )
        })
}
