//! Direct cost endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{authorize, company_header, error_response, PageQuery};
use crate::mock_server::state::{page_of, MockState, ReceivedPart};
use crate::Record;

/// JSON body of a direct cost creation.
#[derive(Debug, Deserialize)]
pub struct CreateDirectCostBody {
    pub item: Record,
}

/// GET /rest/v1.1/projects/{project_id}/direct_costs
pub async fn list_direct_costs(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(project_id): Path<u64>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let mut state = state.write().await;
    state.record_request("GET", uri.path(), uri.query());

    if let Err(rejection) = authorize(&state, &headers).and(company_header(&headers).map(|_| ())) {
        return rejection;
    }

    let costs = page_of(
        state.direct_costs_of(project_id),
        query.page(),
        query.per_page(),
    );
    (StatusCode::OK, Json(costs)).into_response()
}

/// POST /rest/v1.1/projects/{project_id}/direct_costs
pub async fn create_direct_cost(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(project_id): Path<u64>,
    headers: HeaderMap,
    uri: Uri,
    Json(body): Json<CreateDirectCostBody>,
) -> Response {
    let mut state = state.write().await;
    state.record_request("POST", uri.path(), uri.query());

    if let Err(rejection) = authorize(&state, &headers).and(company_header(&headers).map(|_| ())) {
        return rejection;
    }

    match state.create_direct_cost(project_id, body.item) {
        Ok(dc) => (StatusCode::CREATED, Json(dc)).into_response(),
        Err(e) => error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()),
    }
}

/// GET /rest/v1.1/projects/{project_id}/direct_costs/{id}
pub async fn get_direct_cost(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((project_id, direct_cost_id)): Path<(u64, u64)>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let mut state = state.write().await;
    state.record_request("GET", uri.path(), uri.query());

    if let Err(rejection) = authorize(&state, &headers).and(company_header(&headers).map(|_| ())) {
        return rejection;
    }

    match state.get_direct_cost(project_id, direct_cost_id) {
        Some(dc) => (StatusCode::OK, Json(dc.clone())).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            &format!("Direct cost {direct_cost_id} not found"),
        ),
    }
}

/// PATCH /rest/v1.1/projects/{project_id}/direct_costs/{id}
///
/// Accepts `attachments[n]` file parts and appends them to the cost.
pub async fn attach_to_direct_cost(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((project_id, direct_cost_id)): Path<(u64, u64)>,
    headers: HeaderMap,
    uri: Uri,
    mut multipart: Multipart,
) -> Response {
    {
        let mut state = state.write().await;
        state.record_request("PATCH", uri.path(), uri.query());

        if let Err(rejection) =
            authorize(&state, &headers).and(company_header(&headers).map(|_| ()))
        {
            return rejection;
        }
    }

    let mut parts = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        };

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let size = match field.bytes().await {
            Ok(bytes) => bytes.len(),
            Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        };

        if name.starts_with("attachments[") {
            parts.push(ReceivedPart {
                field: name,
                file_name,
                content_type,
                size,
            });
        }
    }

    let mut state = state.write().await;
    match state.attach(project_id, direct_cost_id, parts) {
        Some(dc) => (StatusCode::OK, Json(dc.clone())).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            &format!("Direct cost {direct_cost_id} not found"),
        ),
    }
}
