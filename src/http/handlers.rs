//! Control API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admission::{AtCapacity, ConnectionSnapshot};
use crate::http::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub version: String,
    pub active: usize,
    pub max_connections: usize,
}

/// Body of a 429 answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct CapacityError {
    pub error: String,
    pub active: usize,
    pub limit: usize,
}

impl IntoResponse for AtCapacity {
    fn into_response(self) -> Response {
        let body = CapacityError {
            error: self.to_string(),
            active: self.active,
            limit: self.limit,
        };
        (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn get_status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        active: state.tracker.active_count(),
        max_connections: state.tracker.max_connections(),
    })
}

pub async fn list_streams(State(state): State<AppState>) -> Json<Vec<ConnectionSnapshot>> {
    Json(state.tracker.snapshot())
}

pub async fn reserve(
    State(state): State<AppState>,
    Path((client, stream)): Path<(String, String)>,
) -> Result<StatusCode, AtCapacity> {
    state.tracker.reserve(&client, &stream)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn heartbeat(
    State(state): State<AppState>,
    Path((client, stream)): Path<(String, String)>,
) -> Result<StatusCode, AtCapacity> {
    state.tracker.heartbeat(&client, &stream)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn release(
    State(state): State<AppState>,
    Path((client, stream)): Path<(String, String)>,
) -> StatusCode {
    state.tracker.release(&client, &stream);
    StatusCode::NO_CONTENT
}
