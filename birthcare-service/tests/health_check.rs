//! Probe endpoint tests.

mod common;

use common::TestApp;

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn health_check_reports_healthy() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "birthcare-service");
    assert_eq!(body["checks"]["postgres"], "up");
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn readiness_check_returns_ok() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn metrics_endpoint_exposes_prometheus_text() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
    // The spawn helper polls /health, so the HTTP counters have samples.
    let body = response.text().await.unwrap();
    assert!(body.contains("http_requests_total"));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn api_routes_require_a_bearer_token() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/api/subscriptions/plans", app.address))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 401);
}
