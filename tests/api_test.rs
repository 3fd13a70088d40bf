//! Router-level tests for the status and trigger endpoints.

use std::collections::HashSet;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use heartbeat_relay::config::RelayConfig;
use heartbeat_relay::state::ErrorKind;
use heartbeat_relay::{HttpServer, Services};

fn app(services: &Services) -> Router {
    let config = RelayConfig::default();
    HttpServer::new(&config.listener, services.app_state(&config)).router()
}

fn services() -> Services {
    Services::with_client(&RelayConfig::default(), None)
}

async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn call_json(app: &Router, method: &str, uri: &str) -> Value {
    let (status, _, body) = call(app, method, uri).await;
    assert_eq!(status, StatusCode::OK, "{} {} returned {}", method, uri, body);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app(&services());
    let json = call_json(&app, "GET", "/health").await;
    assert_eq!(json, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = app(&services());
    let (_, headers, _) = call(&app, "GET", "/health").await;
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_home_page() {
    let app = app(&services());
    let (status, headers, body) = call(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"].to_str().unwrap().starts_with("text/html"));
    assert!(body.contains("heartbeat-relay"));
}

#[tokio::test]
async fn test_heartbeat_reflects_state() {
    let services = services();
    let app = app(&services);

    let json = call_json(&app, "GET", "/heartbeat").await;
    assert_eq!(json["count"], 0);
    assert!(json["last_beat"].is_null());
    assert_eq!(json["status"], "healthy");

    services.heartbeat.beat();
    services.heartbeat.beat();
    let json = call_json(&app, "GET", "/heartbeat").await;
    assert_eq!(json["count"], 2);
    assert!(json["last_beat"].is_string());
}

#[tokio::test]
async fn test_trigger_error_twice() {
    let services = services();
    let app = app(&services);
    let before = services.errors.snapshot().error_count;

    let first = call_json(&app, "POST", "/api/trigger-error").await;
    let second = call_json(&app, "POST", "/api/trigger-error").await;

    assert_eq!(first["status"], "error_triggered");
    assert!(first["error"].as_str().unwrap().starts_with("[MANUAL ERROR]"));
    assert_ne!(first["id"], second["id"]);

    let snapshot = services.errors.snapshot();
    assert_eq!(snapshot.error_count, before + 2);
    let manual: Vec<_> = snapshot
        .recent_errors
        .iter()
        .filter(|r| r.kind == ErrorKind::ManualError)
        .collect();
    assert_eq!(manual.len(), 2);
    assert_eq!(manual[0].id, first["id"].as_str().unwrap());
    assert_eq!(manual[1].id, second["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_trigger_error_ids_never_collide() {
    let services = services();
    let app = app(&services);

    let mut ids = HashSet::new();
    for _ in 0..1_000 {
        let json = call_json(&app, "POST", "/api/trigger-error").await;
        ids.insert(json["id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids.len(), 1_000);
    assert_eq!(services.errors.snapshot().recent_errors.len(), 10);
}

#[tokio::test]
async fn test_status_snapshot() {
    let services = services();
    let app = app(&services);
    services.heartbeat.beat();
    call_json(&app, "POST", "/api/trigger-error").await;

    let json = call_json(&app, "GET", "/api/status").await;
    assert_eq!(json["heartbeat"]["count"], 1);
    assert_eq!(json["error_count"], 1);
    assert_eq!(json["recent_errors"].as_array().unwrap().len(), 1);
    assert_eq!(json["recent_errors"][0]["type"], "ManualError");
    assert_eq!(json["intake"]["logs_enabled"], false);
    assert_eq!(json["intake"]["service"], "heartbeat-relay-demo");
    assert_eq!(json["intake"]["buffered_entries"], 0);

    // Reading does not mutate.
    let again = call_json(&app, "GET", "/api/status").await;
    assert_eq!(again["error_count"], 1);
}

#[tokio::test]
async fn test_test_app_logs_acknowledges() {
    let app = app(&services());
    let json = call_json(&app, "POST", "/api/test-app-logs").await;
    assert_eq!(json["status"], "test_completed");
    assert_eq!(json["tested_types"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_wrong_method_and_unknown_route() {
    let app = app(&services());
    let (status, _, _) = call(&app, "GET", "/api/trigger-error").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _, _) = call(&app, "GET", "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
