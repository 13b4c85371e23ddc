//! Health and Metrics Endpoint Tests

use axum::http::StatusCode;

use crate::common::{body_json, body_string, TestApp};

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["active_connections"], 0);
}

#[tokio::test]
async fn health_reports_connection_census() {
    let app = TestApp::new();
    let (_a1, _rx1) = app.register_connection(5);
    let (_a2, _rx2) = app.register_connection(5);
    let (_b, _rx3) = app.register_connection(9);

    let json = body_json(app.get("/health").await).await;

    assert_eq!(json["active_connections"], 3);
    assert_eq!(json["connected_users"], 2);
}

#[tokio::test]
async fn liveness_probe_returns_ok() {
    let app = TestApp::new();

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "alive");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_text() {
    let app = TestApp::new();

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("realtime_gateway"));
}
