//! House Repository Implementation
//!
//! PostgreSQL implementation of the HouseRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{House, HouseRepository};
use crate::shared::error::AppError;

/// Database row representation matching the houses table schema.
#[derive(Debug, sqlx::FromRow)]
struct HouseRow {
    id: i64,
    name: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl HouseRow {
    /// Convert database row to domain House entity.
    fn into_house(self) -> House {
        House {
            id: self.id,
            name: self.name,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL house repository implementation.
#[derive(Clone)]
pub struct PgHouseRepository {
    pool: PgPool,
}

impl PgHouseRepository {
    /// Create a new PgHouseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HouseRepository for PgHouseRepository {
    /// Find a house by its ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<House>, AppError> {
        let row = sqlx::query_as::<_, HouseRow>(
            r#"
            SELECT id, name, address, created_at, updated_at
            FROM houses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_house()))
    }

    /// Find all houses a user is assigned to, home house first.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<House>, AppError> {
        let rows = sqlx::query_as::<_, HouseRow>(
            r#"
            SELECT h.id, h.name, h.address, h.created_at, h.updated_at
            FROM houses h
            INNER JOIN housing_assignments ha ON h.id = ha.house_id
            WHERE ha.user_id = $1
            ORDER BY ha.moved_in_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_house()).collect())
    }
}
