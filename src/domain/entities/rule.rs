//! House rule entity and repository trait.
//!
//! Maps to the `rules` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Minimum rule content length in characters.
pub const MIN_CONTENT_CHARS: usize = 6;

/// Maximum rule content length in characters.
pub const MAX_CONTENT_CHARS: usize = 500;

/// Represents a single house rule.
///
/// Maps to the `rules` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - house_id: BIGINT NOT NULL REFERENCES houses(id)
/// - content: VARCHAR(500) NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// House this rule belongs to
    pub house_id: i64,

    /// Rule text (6-500 characters)
    pub content: String,

    /// Timestamp when the rule was added
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last amendment
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// Get the content length in characters.
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }

    /// Check if the rule has been amended since creation.
    pub fn is_amended(&self) -> bool {
        self.updated_at > self.created_at
    }
}

impl Default for Rule {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            house_id: 0,
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for Rule data access operations.
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Find a rule by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Rule>, AppError>;

    /// Find all rules of a house, oldest first.
    async fn find_by_house(&self, house_id: i64) -> Result<Vec<Rule>, AppError>;

    /// Create a new rule.
    async fn create(&self, rule: &Rule) -> Result<Rule, AppError>;

    /// Update a rule's content.
    async fn update(&self, rule: &Rule) -> Result<Rule, AppError>;

    /// Delete a rule.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
