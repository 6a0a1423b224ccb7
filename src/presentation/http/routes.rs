//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{
    auth_middleware, create_security_headers_layer, create_security_headers_layer_no_hsts,
    optional_auth_middleware, rate_limit_api, rate_limit_auth,
};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // HSTS only makes sense behind TLS, so development builds skip it
    let security_headers = if state.settings.is_production() {
        create_security_headers_layer()
    } else {
        create_security_headers_layer_no_hsts()
    };

    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Browser-facing rule pages live at the top level, like the rest of the site
        .merge(rule_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Security headers run last (outermost) so headers are added to all responses
        .layer(security_headers)
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes (auth has its own stricter rate limiting)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes (require authentication)
        .nest("/users", user_routes(state.clone()))
        // Apply API rate limiting to all API routes
        .route_layer(middleware::from_fn_with_state(state, rate_limit_api))
}

/// Authentication routes (public, with stricter rate limiting)
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh_token))
        .route("/logout", post(handlers::auth::logout))
        // Apply stricter auth rate limiting
        .route_layer(middleware::from_fn_with_state(state, rate_limit_auth))
}

/// User routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/@me", get(handlers::user::get_current_user))
        .route("/@me/houses", get(handlers::user::get_user_houses))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// House rule routes
///
/// Authentication is optional at the middleware level: the GET and DELETE
/// endpoints answer anonymous browsers with a redirect to the login page,
/// so the handlers decide for themselves what a missing user means.
fn rule_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/houses/{house_id}/rules", get(handlers::rule::list_rules))
        .route("/houses/{house_id}/rules", post(handlers::rule::create_rule))
        .route(
            "/houses/{house_id}/rules/{rule_id}",
            patch(handlers::rule::update_rule),
        )
        .route(
            "/houses/{house_id}/rules/{rule_id}",
            delete(handlers::rule::delete_rule),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_api))
}
