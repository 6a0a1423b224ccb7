//! Housing Assignment Repository Implementation
//!
//! PostgreSQL implementation of the HousingAssignmentRepository trait.
//! Handles residency lookups and membership checks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{HousingAssignment, HousingAssignmentRepository};
use crate::shared::error::AppError;

/// Database row representation matching the housing_assignments table schema.
#[derive(Debug, sqlx::FromRow)]
struct HousingAssignmentRow {
    house_id: i64,
    user_id: i64,
    moved_in_at: DateTime<Utc>,
}

impl HousingAssignmentRow {
    /// Convert database row to domain HousingAssignment entity.
    fn into_assignment(self) -> HousingAssignment {
        HousingAssignment {
            house_id: self.house_id,
            user_id: self.user_id,
            moved_in_at: self.moved_in_at,
        }
    }
}

/// PostgreSQL housing assignment repository implementation.
#[derive(Clone)]
pub struct PgHousingAssignmentRepository {
    pool: PgPool,
}

impl PgHousingAssignmentRepository {
    /// Create a new PgHousingAssignmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HousingAssignmentRepository for PgHousingAssignmentRepository {
    /// Find all assignments for a user, earliest move-in first.
    ///
    /// The first row is the user's home house.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<HousingAssignment>, AppError> {
        let rows = sqlx::query_as::<_, HousingAssignmentRow>(
            r#"
            SELECT house_id, user_id, moved_in_at
            FROM housing_assignments
            WHERE user_id = $1
            ORDER BY moved_in_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_assignment()).collect())
    }

    /// Check if a user is assigned to a house.
    async fn is_member(&self, house_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM housing_assignments WHERE house_id = $1 AND user_id = $2)",
        )
        .bind(house_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }
}
