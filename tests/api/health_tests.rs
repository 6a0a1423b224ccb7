//! Health Check and Infrastructure Endpoint Tests

use axum::body::Body;
use axum::http::{Request, StatusCode};

use crate::common::{read_json, TestApp};

/// Test basic health check endpoint returns 200 OK
#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
}

/// Test health check returns JSON with status and version fields
#[tokio::test]
async fn test_health_check_returns_json() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    let json = read_json(response).await;

    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

/// Test liveness probe endpoint
#[tokio::test]
async fn test_liveness_probe() {
    // Liveness must not depend on downstream services
    let app = TestApp::new().await;

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["status"], "alive");
}

/// Test readiness probe reports the database check
#[tokio::test]
async fn test_readiness_probe_reports_database() {
    let app = TestApp::new().await;

    let response = app.get("/health/ready").await;

    // 200 with a reachable database, 503 without; the body names the check
    // either way
    assert!(
        response.status() == StatusCode::OK
            || response.status() == StatusCode::SERVICE_UNAVAILABLE
    );
    let json = read_json(response).await;
    assert!(json["checks"]["database"]["status"].is_string());
    assert!(json["uptime_seconds"].is_number());
}

/// Test Prometheus metrics endpoint is exposed
#[tokio::test]
async fn test_metrics_endpoint_exposed() {
    let app = TestApp::new().await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .expect("metrics response should have a content type")
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/plain"));
}

/// Test security headers are applied to all responses
#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
    // The test environment runs without TLS, so no HSTS
    assert!(headers.get("strict-transport-security").is_none());
}

/// Test CORS preflight allows the configured origin
#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/v1/auth/login")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .expect("preflight should answer with an allowed origin"),
        "http://localhost:3000"
    );
}

/// Test unknown routes fall through to 404
#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = TestApp::new().await;

    let response = app.get("/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
