//! API endpoint integration tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use npu_chat::BackendError;
use npu_chat::api::ApiServerBuilder;
use tower::ServiceExt;

mod common;
use common::{MockBackend, gateway_with};

/// Build a test API router over a mock backend
fn build_test_router(backend: Arc<MockBackend>) -> (axum::Router, Arc<npu_chat::ContextStore>) {
    let (gateway, context) = gateway_with(backend, true, 3);
    let router = ApiServerBuilder::new(gateway, "127.0.0.1:0").build().router();
    (router, context)
}

/// Percent-encode a form value
fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b' ' => "+".to_string(),
            b if b.is_ascii_alphanumeric() => (b as char).to_string(),
            b => format!("%{b:02X}"),
        })
        .collect()
}

fn search_request(question: &str) -> Request<Body> {
    let body = format!("input_text={}", form_encode(question));
    Request::builder()
        .method("POST")
        .uri("/search")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = build_test_router(MockBackend::replying("unused"));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_index_page_is_not_cached() {
    let (app, _) = build_test_router(MockBackend::replying("unused"));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::PRAGMA], "no-cache");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "no-cache, no-store, must-revalidate"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("name=\"input_text\""));
    assert!(html.contains("addCopyButton"));
}

#[tokio::test]
async fn test_search_returns_wrapped_answer() {
    let backend = MockBackend::replying("**4**");
    let (app, context) = build_test_router(backend.clone());

    let response = app.oneshot(search_request("What is 2+2?")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache, no-store, must-revalidate");
    let json = json_body(response).await;
    assert_eq!(json["content"], "<md class='markdown-style'>**4**</md>");
    assert_eq!(context.entries(), vec!["**4**"]);
    assert_eq!(backend.prompts().await[0].input, "What is 2+2? ");
}

#[tokio::test]
async fn test_search_control_command() {
    let backend = MockBackend::replying("unused");
    let (app, context) = build_test_router(backend.clone());
    context.append("old");

    let response = app.oneshot(search_request("clear")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["content"].as_str().unwrap().contains("context cleared."));
    assert!(context.is_empty());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_search_backend_failure() {
    let backend = MockBackend::failing(BackendError::Connection("connection refused".to_string()));
    let (app, context) = build_test_router(backend);

    let response = app.oneshot(search_request("hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    let content = json["content"].as_str().unwrap();
    assert!(content.contains("connection refused"));
    assert!(content.contains("may be offline"));
    assert!(context.is_empty());
}

#[tokio::test]
async fn test_search_timeout_status() {
    let backend = MockBackend::failing(BackendError::Timeout);
    let (app, _) = build_test_router(backend);

    let response = app.oneshot(search_request("hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = json_body(response).await;
    assert!(json["content"].as_str().unwrap().contains("try again later"));
}

#[tokio::test]
async fn test_search_busy_while_backend_held() {
    let backend = MockBackend::held("first");
    let (app, _) = build_test_router(backend.clone());

    let first = tokio::spawn(app.clone().oneshot(search_request("first question")));
    backend.wait_entered().await;

    let ready = app
        .clone()
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(ready).await["gate"], "held");

    let second = app.clone().oneshot(search_request("second question")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = json_body(second).await;
    assert!(json["content"].as_str().unwrap().contains("one request at a time"));

    backend.release();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_ready_reports_context() {
    let (app, context) = build_test_router(MockBackend::replying("unused"));
    context.append("one");

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["gate"], "free");
    assert_eq!(json["context"]["enabled"], true);
    assert_eq!(json["context"]["entries"], 1);
    assert_eq!(json["context"]["max_depth"], 3);
}
