//! House Rule API Tests
//!
//! Covers the browser-facing branches: redirects for anonymous visitors,
//! auth enforcement for writes, and input validation. Flows that persist
//! rules need a live database and are exercised by the service layer unit
//! tests instead.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{read_json, TestApp};

/// Test anonymous visitors are sent to the login page
#[tokio::test]
async fn test_anonymous_list_redirects_to_login() {
    let app = TestApp::new().await;

    let response = app.get("/houses/1/rules").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");
}

/// Test a request with an unverifiable token is treated as anonymous
#[tokio::test]
async fn test_invalid_token_is_treated_as_anonymous() {
    let app = TestApp::new().await;

    let response = app.get_auth("/houses/1/rules", "not-a-real-token").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");
}

/// Test listing with an unparseable house ID fails before any lookup
#[tokio::test]
async fn test_list_with_unparseable_house_id_fails() {
    let app = TestApp::new().await;
    let token = app.access_token_for(42);

    let response = app.get_auth("/houses/abc/rules", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["message"], "Invalid house ID");
}

/// Test anonymous rule creation is rejected outright
#[tokio::test]
async fn test_anonymous_create_is_unauthorized() {
    let app = TestApp::new().await;
    let body = json!({ "content": "no dishes in the sink overnight" });

    let response = app.post_json("/houses/1/rules", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["code"], 10003);
}

/// Test rule content must be at least six characters
#[tokio::test]
async fn test_create_rejects_short_content() {
    let app = TestApp::new().await;
    let token = app.access_token_for(42);
    let body = json!({ "content": "nope" });

    let response = app
        .post_json_auth("/houses/1/rules", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["code"], 10007);
    assert_eq!(json["errors"][0]["field"], "content");
    assert_eq!(json["errors"][0]["message"], "Content must be 6-500 characters");
}

/// Test rule content may not exceed five hundred characters
#[tokio::test]
async fn test_create_rejects_overlong_content() {
    let app = TestApp::new().await;
    let token = app.access_token_for(42);
    let body = json!({ "content": "x".repeat(501) });

    let response = app
        .post_json_auth("/houses/1/rules", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["errors"][0]["field"], "content");
}

/// Test anonymous rule updates are rejected outright
#[tokio::test]
async fn test_anonymous_update_is_unauthorized() {
    let app = TestApp::new().await;
    let body = json!({ "content": "recycling goes out on Tuesdays" });

    let request = Request::builder()
        .method("PATCH")
        .uri("/houses/1/rules/2")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Test updates validate content before touching anything
#[tokio::test]
async fn test_update_validates_content_first() {
    let app = TestApp::new().await;
    let token = app.access_token_for(42);
    let body = json!({ "content": "nope" });

    let response = app
        .patch_json_auth_xhr("/houses/1/rules/2", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["code"], 10007);
}

/// Test updating with an unparseable rule ID fails before any lookup
#[tokio::test]
async fn test_update_with_unparseable_rule_id_fails() {
    let app = TestApp::new().await;
    let token = app.access_token_for(42);
    let body = json!({ "content": "recycling goes out on Tuesdays" });

    let response = app
        .patch_json_auth("/houses/7/rules/abc", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["message"], "Invalid rule ID");
}

/// Test anonymous deletes are sent to the login page
#[tokio::test]
async fn test_anonymous_delete_redirects_to_login() {
    let app = TestApp::new().await;

    let response = app.delete("/houses/1/rules/2").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");
}

/// Test browser deletes bounce to the message board and leave the rule alone
#[tokio::test]
async fn test_browser_delete_redirects_to_message_board() {
    let app = TestApp::new().await;
    let token = app.access_token_for(42);

    let response = app.delete_auth("/houses/7/rules/3", &token).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/houses/7/messages"
    );
}

/// Test XHR delete with an unparseable rule ID fails
#[tokio::test]
async fn test_xhr_delete_with_unparseable_rule_id_fails() {
    let app = TestApp::new().await;
    let token = app.access_token_for(42);

    let response = app.delete_auth_xhr("/houses/7/rules/abc", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["message"], "Invalid rule ID");
}

/// Test rule endpoints carry rate limit headers
#[tokio::test]
async fn test_rule_responses_carry_rate_limit_headers() {
    let app = TestApp::new().await;

    let response = app.get("/houses/1/rules").await;

    assert!(response.headers().get("x-ratelimit-limit").is_some());
}
