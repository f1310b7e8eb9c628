//! HTTP handlers for the turn endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::application::Engine;
use crate::domain::foundation::TurnMetadata;

use super::dto::ErrorResponse;

/// Shared state for the turn endpoint.
#[derive(Clone)]
pub struct TurnAppState {
    pub engine: Arc<Engine>,
}

impl TurnAppState {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

/// Collects headers and the untouched body for verifiers.
fn metadata(headers: &HeaderMap, body: &Bytes) -> TurnMetadata {
    let mut metadata = TurnMetadata::new().with_raw_body(body.to_vec());
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            metadata.insert_header(name.as_str(), value);
        }
    }
    metadata
}

/// POST / - Runs one turn for a platform payload.
pub async fn perform_turn(
    State(state): State<TurnAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            let error = ErrorResponse::bad_request(format!("Invalid JSON payload: {}", e));
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    match state.engine.perform(payload, metadata(&headers, &body)).await {
        Ok(response) => {
            let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::OK);
            (status, Json(response.output())).into_response()
        }
        Err(failure) => {
            let error = ErrorResponse::internal(failure.error.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}

/// GET /health - Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
