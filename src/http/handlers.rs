//! Endpoint handlers.

use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::health::HealthSnapshot;
use crate::http::middleware::RequestContext;
use crate::http::request::RequestId;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

/// `GET /ping`: liveness, correlated with the request's trace.
pub async fn ping(
    State(state): State<AppState>,
    request_id: RequestId,
    RequestContext(cx): RequestContext,
) -> Json<PingResponse> {
    let start = Instant::now();
    let info = state.trace_reader.extract(&cx);

    tracing::debug!(
        request_id = %request_id.as_str(),
        trace_id = %info.trace_id_hex(),
        sampled = info.sampled,
        "Ping"
    );

    metrics::record_request("/ping", 200, start);
    Json(PingResponse {
        message: "pong".to_string(),
    })
}

/// `GET /health`: current health snapshot.
///
/// Always 200; the verdict is in the body.
pub async fn health(State(state): State<AppState>) -> Json<HealthSnapshot> {
    let start = Instant::now();
    let snapshot = state.health.check().await;

    metrics::record_health(snapshot.status);
    metrics::record_request("/health", 200, start);
    Json(snapshot)
}
