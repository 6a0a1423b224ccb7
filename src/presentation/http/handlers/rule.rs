//! House Rule Handlers
//!
//! These endpoints serve both the browser UI and XHR clients, so several of
//! them answer with a redirect instead of an error body.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateRuleRequest, UpdateRuleRequest};
use crate::application::dto::response::{RuleResponse, UpdateRuleResponse};
use crate::application::services::{RuleError, RuleListing, RuleService, RuleServiceImpl};
use crate::infrastructure::repositories::{
    PgHouseRepository, PgHousingAssignmentRepository, PgNotificationRepository, PgRuleRepository,
    PgUserRepository,
};
use crate::presentation::http::extractors::XhrRequest;
use crate::presentation::middleware::MaybeUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn rule_service(state: &AppState) -> impl RuleService {
    let rule_repo = Arc::new(PgRuleRepository::new(state.db.clone()));
    let house_repo = Arc::new(PgHouseRepository::new(state.db.clone()));
    let assignment_repo = Arc::new(PgHousingAssignmentRepository::new(state.db.clone()));
    let notification_repo = Arc::new(PgNotificationRepository::new(state.db.clone()));
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));

    RuleServiceImpl::new(
        rule_repo,
        house_repo,
        assignment_repo,
        notification_repo,
        user_repo,
        state.snowflake.clone(),
    )
}

fn map_rule_error(e: RuleError) -> AppError {
    match e {
        RuleError::NotFound => AppError::NotFound("Rule not found".into()),
        RuleError::HouseNotFound => AppError::NotFound("House not found".into()),
        RuleError::Forbidden => AppError::Forbidden("You are not a resident of this house".into()),
        RuleError::NoHouse => AppError::Forbidden("You are not assigned to any house".into()),
        RuleError::UserNotFound => AppError::Unauthorized("User not found".into()),
        RuleError::ContentTooShort => {
            AppError::BadRequest("Content must be at least 6 characters".into())
        }
        RuleError::ContentTooLong => {
            AppError::BadRequest("Content must be at most 500 characters".into())
        }
        RuleError::Internal(msg) => AppError::Internal(msg),
    }
}

/// List a house's rules
///
/// Anonymous visitors are sent to the login page. A resident asking for a
/// house other than their own is sent to their home house's rules instead.
pub async fn list_rules(
    State(state): State<AppState>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Path(house_id): Path<String>,
) -> Result<Response, AppError> {
    let Some(auth) = user else {
        return Ok(Redirect::to("/login").into_response());
    };

    let house_id: i64 = house_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid house ID".into()))?;

    let listing = rule_service(&state)
        .list_rules(auth.user_id, house_id)
        .await
        .map_err(map_rule_error)?;

    match listing {
        RuleListing::Rules(rules) => {
            let responses: Vec<RuleResponse> = rules.into_iter().map(RuleResponse::from).collect();
            Ok(Json(responses).into_response())
        }
        RuleListing::HomeHouse(home_id) => {
            Ok(Redirect::to(&format!("/houses/{}/rules", home_id)).into_response())
        }
    }
}

/// Add a rule to a house and announce it to the housemates
pub async fn create_rule(
    State(state): State<AppState>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Path(house_id): Path<String>,
    Json(body): Json<CreateRuleRequest>,
) -> Result<(StatusCode, Json<RuleResponse>), AppError> {
    let auth = user.ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;

    body.validate().map_err(validation_error)?;

    let house_id: i64 = house_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid house ID".into()))?;

    let rule = rule_service(&state)
        .create_rule(auth.user_id, house_id, &body.content)
        .await
        .map_err(map_rule_error)?;

    Ok((StatusCode::CREATED, Json(RuleResponse::from(rule))))
}

/// Amend a rule and announce the new content
///
/// XHR callers get the updated rule back as JSON; browser form posts are
/// redirected to the house's rules page.
pub async fn update_rule(
    State(state): State<AppState>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    XhrRequest(is_xhr): XhrRequest,
    Path((house_id, rule_id)): Path<(String, String)>,
    Json(body): Json<UpdateRuleRequest>,
) -> Result<Response, AppError> {
    let auth = user.ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;

    body.validate().map_err(validation_error)?;

    let house_id: i64 = house_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid house ID".into()))?;
    let rule_id: i64 = rule_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid rule ID".into()))?;

    let rule = rule_service(&state)
        .update_rule(auth.user_id, house_id, rule_id, &body.content)
        .await
        .map_err(map_rule_error)?;

    if is_xhr {
        Ok(Json(UpdateRuleResponse {
            rule: RuleResponse::from(rule),
        })
        .into_response())
    } else {
        Ok(Redirect::to(&format!("/houses/{}/rules", house_id)).into_response())
    }
}

/// Remove a rule
///
/// Anonymous visitors are sent to the login page. Browser requests are sent
/// back to the house's message board with the rule left in place; only XHR
/// callers actually delete.
pub async fn delete_rule(
    State(state): State<AppState>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    XhrRequest(is_xhr): XhrRequest,
    Path((house_id, rule_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let Some(auth) = user else {
        return Ok(Redirect::to("/login").into_response());
    };

    let house_id: i64 = house_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid house ID".into()))?;
    let rule_id: i64 = rule_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid rule ID".into()))?;

    if !is_xhr {
        return Ok(Redirect::to(&format!("/houses/{}/messages", house_id)).into_response());
    }

    rule_service(&state)
        .delete_rule(auth.user_id, house_id, rule_id)
        .await
        .map_err(map_rule_error)?;

    Ok(StatusCode::OK.into_response())
}
