//! Housing assignment entity and repository trait.
//!
//! Maps to the `housing_assignments` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a user's residency in a house.
///
/// Maps to the `housing_assignments` table:
/// - house_id: BIGINT NOT NULL REFERENCES houses(id) (composite PK)
/// - user_id: BIGINT NOT NULL REFERENCES users(id) (composite PK)
/// - moved_in_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// A user's "home" house is their earliest assignment; notification fan-out
/// targets every assignment of a house.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousingAssignment {
    /// House ID (part of composite primary key)
    pub house_id: i64,

    /// User ID (part of composite primary key)
    pub user_id: i64,

    /// When the user moved into the house
    pub moved_in_at: DateTime<Utc>,
}

impl HousingAssignment {
    /// Create a new assignment with just the required fields.
    pub fn new(house_id: i64, user_id: i64) -> Self {
        Self {
            house_id,
            user_id,
            moved_in_at: Utc::now(),
        }
    }
}

impl Default for HousingAssignment {
    fn default() -> Self {
        Self {
            house_id: 0,
            user_id: 0,
            moved_in_at: Utc::now(),
        }
    }
}

/// Repository trait for HousingAssignment data access operations.
#[async_trait]
pub trait HousingAssignmentRepository: Send + Sync {
    /// Find all assignments for a user, earliest move-in first.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<HousingAssignment>, AppError>;

    /// Check if a user is assigned to a house.
    async fn is_member(&self, house_id: i64, user_id: i64) -> Result<bool, AppError>;
}
