//! House entity and repository trait.
//!
//! Maps to the `houses` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a shared household.
///
/// A house is the tenancy boundary: rules, notifications, and housing
/// assignments are all scoped to one house.
///
/// Maps to the `houses` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - name: VARCHAR(100) NOT NULL
/// - address: TEXT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct House {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// House name (1-100 characters)
    pub name: String,

    /// Street address
    pub address: Option<String>,

    /// House creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for House {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            address: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for House data access operations.
#[async_trait]
pub trait HouseRepository: Send + Sync {
    /// Find a house by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<House>, AppError>;

    /// Find all houses a user is assigned to, earliest assignment first.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<House>, AppError>;
}
