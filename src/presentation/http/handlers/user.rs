//! User Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::application::dto::response::{HouseResponse, UserResponse};
use crate::application::services::{UserService, UserServiceImpl};
use crate::infrastructure::repositories::{PgHouseRepository, PgUserRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn user_service(state: &AppState) -> impl UserService {
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let house_repo = Arc::new(PgHouseRepository::new(state.db.clone()));

    UserServiceImpl::new(user_repo, house_repo)
}

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service(&state)
        .get_user(auth.user_id)
        .await
        .map_err(|e| match e {
            crate::application::services::UserError::NotFound => {
                AppError::NotFound("User not found".into())
            }
            e => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(UserResponse::from_dto(user)))
}

/// Get the houses the current user lives in
pub async fn get_user_houses(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<HouseResponse>>, AppError> {
    let houses = user_service(&state)
        .get_user_houses(auth.user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let responses: Vec<HouseResponse> = houses.into_iter().map(HouseResponse::from).collect();

    Ok(Json(responses))
}
