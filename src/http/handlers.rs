//! Handlers for `/api/request` and `/health`.

use axum::{
    extract::{rejection::JsonRejection, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Instant;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::requests::{CreateRequest, ErrorKind, ListQuery, ServiceResult, StatusUpdate};

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Turn a service outcome into a response and record it.
fn respond<T: Serialize>(
    operation: &'static str,
    start: Instant,
    success: StatusCode,
    result: ServiceResult<T>,
) -> Response {
    let response = match result {
        Ok(value) => (success, Json(value)).into_response(),
        Err(e) => {
            if e.kind() == ErrorKind::Unknown {
                metrics::record_store_error(operation);
            }
            ApiError::from(e).into_response()
        }
    };
    metrics::record_request(operation, response.status().as_u16(), start);
    response
}

fn rejected(operation: &'static str, start: Instant, message: String) -> Response {
    let response = ApiError::invalid(message).into_response();
    metrics::record_request(operation, response.status().as_u16(), start);
    response
}

/// First occurrence of each list parameter. Repeats and unknown keys are
/// ignored, never rejected.
fn list_query(raw: Option<&str>) -> ListQuery {
    let mut query = ListQuery::default();
    for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "page" if query.page.is_none() => query.page = Some(value.into_owned()),
            "status" if query.status.is_none() => query.status = Some(value.into_owned()),
            _ => {}
        }
    }
    query
}

/// `GET /api/request?page=&status=`
pub async fn list_requests(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let start = Instant::now();
    let result = state.service.list(list_query(raw.as_deref())).await;
    respond("list", start, StatusCode::OK, result)
}

/// `PUT /api/request` with `{requestorName, itemRequested}`.
pub async fn create_request(
    State(state): State<AppState>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected("create", start, rejection.body_text()),
    };

    let result = state.service.create(body).await;
    respond("create", start, StatusCode::CREATED, result)
}

/// `PATCH /api/request` with `{id, status}`.
pub async fn update_request_status(
    State(state): State<AppState>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected("update_status", start, rejection.body_text()),
    };

    let result = state.service.update_status(body).await;
    respond("update_status", start, StatusCode::OK, result)
}
