//! Request Logging Middleware
//!
//! Structured request/response logging via tower-http's TraceLayer, plus a
//! small middleware that feeds the Prometheus request metrics.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::infrastructure::metrics;

/// Create the HTTP trace layer
pub fn create_trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

/// Middleware that records request count and latency metrics.
///
/// Uses the matched route pattern rather than the raw path so metric
/// cardinality stays bounded.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let method = request.method().clone();

    let response = next.run(request).await;

    let latency = start.elapsed().as_secs_f64();
    metrics::record_http_request(method.as_str(), &path, response.status().as_u16(), latency);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_track_metrics_passes_response_through() {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn(track_metrics));

        let server = TestServer::new(app).unwrap();
        let response = server.get("/ping").await;

        response.assert_status_ok();
        response.assert_text("pong");
    }
}
