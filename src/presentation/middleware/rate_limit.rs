//! Rate Limiting Middleware
//!
//! In-memory rate limiting using a sliding window algorithm. Each caller
//! gets a window of recent request timestamps; a request is allowed while
//! the window holds fewer than the configured maximum.

use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::config::RateLimitSettings;
use crate::presentation::middleware::auth::AuthUser;
use crate::shared::error::ErrorResponse;
use crate::startup::AppState;

/// Stale windows are swept once per this many checks.
const SWEEP_INTERVAL: u64 = 4096;

// ============================================================================
// Rate Limit Configuration
// ============================================================================

/// Configuration for rate limiting behavior.
///
/// Different endpoint types can have different limits to balance
/// security concerns with user experience.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window for this endpoint type
    pub requests_per_window: u32,
    /// Window duration in seconds
    pub window_seconds: u64,
    /// Optional burst allowance above base limit
    pub burst_allowance: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 60,
            window_seconds: 60,
            burst_allowance: 10,
        }
    }
}

// ============================================================================
// Rate Limit Response
// ============================================================================

/// Information about rate limit status returned to clients.
#[derive(Debug, Serialize)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Unix timestamp when the rate limit resets
    pub reset_at: i64,
    /// Seconds until the rate limit resets
    pub retry_after: u64,
}

/// Rate limit exceeded error response.
#[derive(Debug, Serialize)]
struct RateLimitExceededResponse {
    #[serde(flatten)]
    error: ErrorResponse,
    rate_limit: RateLimitInfo,
}

// ============================================================================
// Rate Limiter Implementation
// ============================================================================

/// In-memory sliding window rate limiter.
///
/// # Algorithm
///
/// Each identifier maps to a vector of request timestamps in milliseconds,
/// appended in arrival order. On each request:
/// 1. Drop timestamps older than the window
/// 2. Count the remainder
/// 3. If under the limit, record the request and allow
/// 4. If over, reject with retry information derived from the oldest entry
///
/// Windows live in a [`DashMap`], so checks on different identifiers do not
/// contend. State is per process; a multi-instance deployment rate limits
/// per instance.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, Vec<i64>>>,
    checks: Arc<AtomicU64>,
    key_prefix: &'static str,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with the given key prefix and configuration.
    pub fn new(key_prefix: &'static str, config: RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            checks: Arc::new(AtomicU64::new(1)),
            key_prefix,
            config,
        }
    }

    /// Check if a request should be allowed.
    ///
    /// Returns `Ok(RateLimitInfo)` if allowed, `Err(RateLimitInfo)` if rate limited.
    pub fn check(&self, identifier: &str) -> Result<RateLimitInfo, RateLimitInfo> {
        let key = format!("{}:{}", self.key_prefix, identifier);
        let now_ms = chrono::Utc::now().timestamp_millis();
        let window_ms = (self.config.window_seconds * 1000) as i64;
        let window_start = now_ms - window_ms;
        let max_requests = self.config.requests_per_window + self.config.burst_allowance;

        self.maybe_sweep(window_start);

        let mut entry = self.windows.entry(key).or_default();

        // Drop entries outside the window
        entry.retain(|&stamp| stamp > window_start);

        let current_count = entry.len() as u32;
        let reset_at = (now_ms / 1000) + self.config.window_seconds as i64;

        if current_count < max_requests {
            entry.push(now_ms);

            Ok(RateLimitInfo {
                limit: max_requests,
                remaining: max_requests.saturating_sub(current_count + 1),
                reset_at,
                retry_after: 0,
            })
        } else {
            // Timestamps are appended in order, so the first is the oldest
            let retry_ms = entry
                .first()
                .map(|oldest| oldest + window_ms - now_ms)
                .unwrap_or(0);

            Err(RateLimitInfo {
                limit: max_requests,
                remaining: 0,
                reset_at,
                retry_after: ((retry_ms.max(0) as f64) / 1000.0).ceil() as u64,
            })
        }
    }

    /// Drop windows whose newest entry predates the current window.
    ///
    /// Runs every [`SWEEP_INTERVAL`] checks so idle identifiers do not
    /// accumulate forever.
    fn maybe_sweep(&self, window_start: i64) {
        let n = self.checks.fetch_add(1, Ordering::Relaxed);
        if n % SWEEP_INTERVAL == 0 {
            self.windows
                .retain(|_, stamps| stamps.last().map_or(false, |&t| t > window_start));
        }
    }
}

/// Rate limiters shared through application state.
#[derive(Clone)]
pub struct RateLimiters {
    /// Standard API limiter
    pub api: RateLimiter,
    /// Stricter limiter for credential endpoints
    pub auth: RateLimiter,
}

impl RateLimiters {
    /// Build both limiters from application settings.
    ///
    /// Burst allowances follow the endpoint character: the API limiter
    /// absorbs page-load bursts, the auth limiter only legitimate retries.
    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self {
            api: RateLimiter::new(
                "rl:api",
                RateLimitConfig {
                    requests_per_window: settings.api_requests_per_minute,
                    window_seconds: 60,
                    burst_allowance: 20,
                },
            ),
            auth: RateLimiter::new(
                "rl:auth",
                RateLimitConfig {
                    requests_per_window: settings.auth_requests_per_minute,
                    window_seconds: 60,
                    burst_allowance: 2,
                },
            ),
        }
    }
}

// ============================================================================
// Identifier Extraction
// ============================================================================

/// Extract the rate limit identifier from a request.
///
/// Priority:
/// 1. Authenticated user ID (most accurate, prevents account sharing abuse)
/// 2. X-Forwarded-For header (for reverse proxy setups)
/// 3. X-Real-IP header (common with nginx)
/// 4. Client IP address (fallback)
fn extract_identifier(request: &Request, client_ip: Option<IpAddr>) -> String {
    // Check for authenticated user first
    if let Some(auth_user) = request.extensions().get::<AuthUser>() {
        return format!("user:{}", auth_user.user_id);
    }

    // First IP in the X-Forwarded-For chain is the original client.
    // The header can be spoofed when not behind a trusted proxy.
    if let Some(forwarded_for) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first_ip) = forwarded_for.split(',').next() {
            let ip = first_ip.trim();
            if ip.parse::<IpAddr>().is_ok() {
                return format!("ip:{}", ip);
            }
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
    {
        if real_ip.parse::<IpAddr>().is_ok() {
            return format!("ip:{}", real_ip);
        }
    }

    // Fall back to connection IP
    match client_ip {
        Some(ip) => format!("ip:{}", ip),
        None => {
            tracing::warn!("Could not determine client identifier for rate limiting");
            "ip:unknown".to_string()
        }
    }
}

// ============================================================================
// Middleware Functions
// ============================================================================

/// Rate limiting middleware for authentication endpoints.
///
/// Uses stricter limits to slow down credential stuffing, brute force
/// attempts, and account enumeration.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    rate_limit_inner(state.rate_limiters.auth.clone(), request, next).await
}

/// Rate limiting middleware for standard API endpoints.
pub async fn rate_limit_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    rate_limit_inner(state.rate_limiters.api.clone(), request, next).await
}

/// Internal rate limiting implementation.
async fn rate_limit_inner(limiter: RateLimiter, request: Request, next: Next) -> Response {
    // Connect info is only present when served with it enabled; oneshot
    // requests in tests run without
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip());
    let identifier = extract_identifier(&request, client_ip);

    match limiter.check(&identifier) {
        Ok(info) => {
            // Request allowed - add rate limit headers and continue
            let mut response = next.run(request).await;
            add_rate_limit_headers(response.headers_mut(), &info);
            response
        }
        Err(info) => {
            tracing::warn!(
                identifier = %identifier,
                limit = info.limit,
                "Rate limit exceeded"
            );
            create_rate_limit_response(info)
        }
    }
}

/// Add rate limit headers to a response.
///
/// Headers follow the IETF draft standard for rate limiting:
/// https://datatracker.ietf.org/doc/draft-ietf-httpapi-ratelimit-headers/
fn add_rate_limit_headers(headers: &mut header::HeaderMap, info: &RateLimitInfo) {
    if let Ok(v) = header::HeaderValue::from_str(&info.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.reset_at.to_string()) {
        headers.insert("X-RateLimit-Reset", v);
    }
}

/// Create a 429 Too Many Requests response.
fn create_rate_limit_response(info: RateLimitInfo) -> Response {
    let body = RateLimitExceededResponse {
        error: ErrorResponse {
            code: 10006,
            message: "You are being rate limited. Please slow down.".to_string(),
            errors: None,
        },
        rate_limit: RateLimitInfo {
            limit: info.limit,
            remaining: 0,
            reset_at: info.reset_at,
            retry_after: info.retry_after,
        },
    };

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    // Retry-After is the standard HTTP header for 429 responses
    if let Ok(v) = header::HeaderValue::from_str(&info.retry_after.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, v);
    }

    add_rate_limit_headers(
        response.headers_mut(),
        &RateLimitInfo {
            limit: info.limit,
            remaining: 0,
            reset_at: info.reset_at,
            retry_after: info.retry_after,
        },
    );

    response
}

// ============================================================================
// Tests
// ============================================================================
