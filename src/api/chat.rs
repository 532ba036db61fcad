//! Chat page and question submission

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::error::GatewayError;
use crate::render::wrap_markdown;

/// Chat page served at `/`
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Headers that keep browsers from caching the page or answers
const NO_CACHE: [(header::HeaderName, &str); 2] = [
    (header::PRAGMA, "no-cache"),
    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
];

/// Form body posted by the chat page
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub input_text: String,
}

/// Answer returned to the chat page
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
}

/// HTTP status for a failed request
const fn error_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::Busy => StatusCode::TOO_MANY_REQUESTS,
        GatewayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::BackendUnavailable(_) | GatewayError::MalformedBackendResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

async fn index() -> Response {
    (NO_CACHE, Html(INDEX_HTML)).into_response()
}

async fn search(State(state): State<Arc<ApiState>>, Form(form): Form<SearchForm>) -> Response {
    let started = Instant::now();
    tracing::debug!(question = %preview(&form.input_text), "received request");

    let (status, content) = match state.gateway.handle(&form.input_text).await {
        Ok(answer) => (StatusCode::OK, wrap_markdown(&answer)),
        Err(e) => (error_status(&e), e.to_string()),
    };

    let elapsed = format!("{:.2}s", started.elapsed().as_secs_f64());
    tracing::info!(status = status.as_u16(), %elapsed, "completed request");

    (status, NO_CACHE, Json(ChatResponse { content })).into_response()
}

/// First line of a question, truncated for logging
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 80;

    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > MAX_CHARS {
        let cut: String = line.chars().take(MAX_CHARS).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .with_state(state)
}
