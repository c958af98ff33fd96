//! Company endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{authorize, PageQuery};
use crate::mock_server::state::{page_of, MockState};

/// GET /rest/v1.0/companies
pub async fn list_companies(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let mut state = state.write().await;
    state.record_request("GET", uri.path(), uri.query());

    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let companies = page_of(&state.companies, query.page(), query.per_page());
    (StatusCode::OK, Json(companies)).into_response()
}
