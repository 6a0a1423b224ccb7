//! Authentication Middleware
//!
//! JWT validation middleware for protected routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::application::services::Claims;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Possibly authenticated user extension.
///
/// Always inserted by [`optional_auth_middleware`], so handlers behind it can
/// extract it unconditionally and branch on the inner option.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

/// Authentication middleware that validates JWT tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    // Check for Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".into()))?;

    // Decode and validate JWT
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.settings.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired".into())
        }
        _ => AppError::Unauthorized("Invalid token".into()),
    })?;

    // Parse user ID from claims
    let user_id: i64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token claims".into()))?;

    // Insert authenticated user into request extensions
    request.extensions_mut().insert(AuthUser { user_id });

    // Continue to the next handler
    Ok(next.run(request).await)
}

/// Optional authentication middleware (doesn't fail if no token).
///
/// Used by the browser-facing rules routes, which answer anonymous callers
/// with a redirect to `/login` rather than a 401.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_user = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|token| {
            decode::<Claims>(
                token,
                &DecodingKey::from_secret(state.settings.jwt.secret.as_bytes()),
                &Validation::default(),
            )
            .ok()
        })
        .and_then(|data| data.claims.sub.parse::<i64>().ok())
        .map(|user_id| AuthUser { user_id });

    if let Some(ref user) = auth_user {
        request.extensions_mut().insert(user.clone());
    }
    request.extensions_mut().insert(MaybeUser(auth_user));

    next.run(request).await
}
