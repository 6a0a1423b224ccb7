//! Authentication API Tests
//!
//! Covers the request validation and token checking paths. Flows that
//! create or look up accounts need a live database and are exercised by the
//! service layer unit tests instead.

use axum::http::StatusCode;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{read_json, unique_email, TestApp, TEST_USER};

/// Test registration fails with invalid email
#[tokio::test]
async fn test_register_with_invalid_email_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "email": "not-an-email",
        "first_name": TEST_USER.first_name,
        "last_name": TEST_USER.last_name,
        "password": TEST_USER.password,
    });

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["code"], 10007);
    assert_eq!(json["errors"][0]["field"], "email");
}

/// Test registration fails with short password
#[tokio::test]
async fn test_register_with_short_password_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "email": unique_email(),
        "first_name": FirstName().fake::<String>(),
        "last_name": LastName().fake::<String>(),
        "password": "short",
    });

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["errors"][0]["field"], "password");
    assert_eq!(
        json["errors"][0]["message"],
        "Password must be at least 8 characters"
    );
}

/// Test registration rejects bodies with missing fields
#[tokio::test]
async fn test_register_with_missing_fields_is_rejected() {
    let app = TestApp::new().await;
    let body = json!({ "email": TEST_USER.email });

    let response = app
        .post_json("/api/v1/auth/register", &body.to_string())
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Test login validates the email format before anything else
#[tokio::test]
async fn test_login_with_malformed_email_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "email": "nope",
        "password": "irrelevant-but-long",
    });

    let response = app.post_json("/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["code"], 10007);
    assert_eq!(json["errors"][0]["field"], "email");
}

/// Test authenticated endpoint requires token
#[tokio::test]
async fn test_protected_endpoint_requires_auth() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/users/@me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["code"], 10003);
}

/// Test authenticated endpoint rejects garbage tokens
#[tokio::test]
async fn test_protected_endpoint_rejects_garbage_token() {
    let app = TestApp::new().await;

    let response = app.get_auth("/api/v1/users/@me", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["message"], "Invalid token");
}

/// Test authenticated endpoint rejects expired tokens
#[tokio::test]
async fn test_protected_endpoint_rejects_expired_token() {
    let app = TestApp::new().await;
    let token = app.expired_token_for(42);

    let response = app.get_auth("/api/v1/users/@me", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["message"], "Token expired");
}

/// Test user profiles are only served through the @me routes
#[tokio::test]
async fn test_user_lookup_by_id_is_not_routed() {
    let app = TestApp::new().await;
    let token = app.access_token_for(42);

    let response = app.get_auth("/api/v1/users/42", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test rate limit headers are stamped onto API responses
#[tokio::test]
async fn test_auth_responses_carry_rate_limit_headers() {
    let app = TestApp::new().await;
    let body = json!({
        "email": "nope",
        "password": "irrelevant-but-long",
    });

    let response = app.post_json("/api/v1/auth/login", &body.to_string()).await;

    assert!(response.headers().get("x-ratelimit-limit").is_some());
    assert!(response.headers().get("x-ratelimit-remaining").is_some());
}
