//! User Session entity and repository trait.
//!
//! Maps to the `user_sessions` table in the database schema.
//! Used for JWT refresh token management.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Represents a user session for JWT refresh token management.
///
/// Maps to the `user_sessions` table:
/// - id: UUID PRIMARY KEY DEFAULT gen_random_uuid()
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - refresh_token_hash: VARCHAR(255) NOT NULL (SHA-256 hash)
/// - expires_at: TIMESTAMPTZ NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - last_used_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - revoked_at: TIMESTAMPTZ NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// UUID primary key
    pub id: Uuid,

    /// User ID this session belongs to
    pub user_id: i64,

    /// SHA-256 hash of the refresh token (never store raw tokens)
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,

    /// When this session expires
    pub expires_at: DateTime<Utc>,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session was last used (refresh token used)
    pub last_used_at: DateTime<Utc>,

    /// When the session was revoked (None if active)
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check if the session is currently active (not expired, not revoked).
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }

    /// Check if the session has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Create a new session.
    pub fn new(user_id: i64, refresh_token_hash: String, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_hash,
            expires_at,
            created_at: now,
            last_used_at: now,
            revoked_at: None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: 0,
            refresh_token_hash: String::new(),
            expires_at: now,
            created_at: now,
            last_used_at: now,
            revoked_at: None,
        }
    }
}

/// Repository trait for Session data access operations.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by refresh token hash.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Create a new session.
    async fn create(&self, session: &Session) -> Result<Session, AppError>;

    /// Replace the refresh token hash after rotation.
    async fn update_token_hash(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Revoke a session (set revoked_at).
    async fn revoke(&self, id: Uuid) -> Result<(), AppError>;
}
