//! Notification entity and repository trait.
//!
//! Maps to the `notifications` and `user_notifications` tables in the
//! database schema. A notification is a house-wide announcement; delivery
//! creates one `user_notifications` row per housing assignment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Category for rule-change notifications.
pub const CATEGORY_RULES: &str = "rules";

/// Represents a house-wide announcement.
///
/// Maps to the `notifications` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - house_id: BIGINT NOT NULL REFERENCES houses(id)
/// - alert: TEXT NOT NULL
/// - category: VARCHAR(50) NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// House the announcement belongs to
    pub house_id: i64,

    /// Human-readable announcement text
    pub alert: String,

    /// Announcement category (e.g. "rules")
    pub category: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Announcement for a newly added rule.
    pub fn rule_added(id: i64, house_id: i64, actor_first_name: &str, content: &str) -> Self {
        Self {
            id,
            house_id,
            alert: format!(
                "{} has added {} to the house rules.",
                actor_first_name, content
            ),
            category: CATEGORY_RULES.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Announcement for an amended rule.
    pub fn rule_updated(id: i64, house_id: i64, actor_first_name: &str, content: &str) -> Self {
        Self {
            id,
            house_id,
            alert: format!("{} has updated {}.", actor_first_name, content),
            category: CATEGORY_RULES.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Announcement for a removed rule.
    pub fn rule_deleted(id: i64, house_id: i64, actor_first_name: &str, content: &str) -> Self {
        Self {
            id,
            house_id,
            alert: format!("{} has deleted {}.", actor_first_name, content),
            category: CATEGORY_RULES.to_string(),
            created_at: Utc::now(),
        }
    }
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            id: 0,
            house_id: 0,
            alert: String::new(),
            category: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Outcome of a notification fan-out.
#[derive(Debug, Clone)]
pub struct DeliveredNotification {
    /// The stored announcement
    pub notification: Notification,

    /// Number of housemates it was delivered to
    pub recipients: u64,
}

/// Repository trait for Notification data access operations.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist an announcement and fan it out to every housing assignment
    /// of its house, atomically.
    async fn deliver_to_house(
        &self,
        notification: &Notification,
    ) -> Result<DeliveredNotification, AppError>;
}
