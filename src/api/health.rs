//! Health check endpoints

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness response with gate and context state
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub gate: &'static str,
    pub context: ContextStatus,
}

/// Snapshot of the conversation context
#[derive(Serialize)]
pub struct ContextStatus {
    pub enabled: bool,
    pub entries: usize,
    pub max_depth: usize,
}

/// Liveness probe - is the service running?
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe - reports whether an inference call is in flight
async fn ready(State(state): State<Arc<ApiState>>) -> Json<ReadinessResponse> {
    let context = state.gateway.context();

    Json(ReadinessResponse {
        status: "ok",
        gate: if state.gateway.is_busy() { "held" } else { "free" },
        context: ContextStatus {
            enabled: context.is_enabled(),
            entries: context.len(),
            max_depth: context.max_depth(),
        },
    })
}

/// Build health router (liveness only, no state needed)
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Build readiness router (needs state for checks)
pub fn ready_router(state: Arc<ApiState>) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
