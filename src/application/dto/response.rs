//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::{AuthTokens, HousePreviewDto, RuleDto, UserDto};
use crate::domain::User;

/// Authentication tokens response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// Registration response (includes user and tokens)
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

impl UserResponse {
    pub fn from_user(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }

    pub fn from_dto(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            created_at: dto.created_at,
        }
    }
}

/// House response
#[derive(Debug, Serialize)]
pub struct HouseResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub home: bool,
}

impl From<HousePreviewDto> for HouseResponse {
    fn from(dto: HousePreviewDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            address: dto.address,
            home: dto.home,
        }
    }
}

/// Rule response
#[derive(Debug, Serialize)]
pub struct RuleResponse {
    pub id: String,
    pub house_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RuleDto> for RuleResponse {
    fn from(dto: RuleDto) -> Self {
        Self {
            id: dto.id,
            house_id: dto.house_id,
            content: dto.content,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

/// Amendment echo returned to XHR callers
#[derive(Debug, Serialize)]
pub struct UpdateRuleResponse {
    pub rule: RuleResponse,
}
