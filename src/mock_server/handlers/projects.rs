//! Project endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{authorize, error_response};
use crate::mock_server::state::{page_of, MockState};

/// Query parameters for listing projects.
#[derive(Debug, Default, Deserialize)]
pub struct ListProjectsQuery {
    pub company_id: Option<u64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /rest/v1.1/projects
pub async fn list_projects(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<ListProjectsQuery>,
) -> Response {
    let mut state = state.write().await;
    state.record_request("GET", uri.path(), uri.query());

    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let Some(company_id) = query.company_id else {
        return error_response(StatusCode::BAD_REQUEST, "company_id is required");
    };

    let projects = page_of(
        state.projects_of(company_id),
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(100),
    );
    (StatusCode::OK, Json(projects)).into_response()
}
