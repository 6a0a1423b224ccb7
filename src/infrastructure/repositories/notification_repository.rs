//! Notification Repository Implementation
//!
//! PostgreSQL implementation of notification storage and fan-out.
//! Delivery inserts the announcement and one user_notifications row per
//! housing assignment in a single transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{DeliveredNotification, Notification, NotificationRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Database row representation matching the notifications table schema.
#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    house_id: i64,
    alert: String,
    category: String,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    /// Convert database row to domain Notification entity.
    fn into_notification(self) -> Notification {
        Notification {
            id: self.id,
            house_id: self.house_id,
            alert: self.alert,
            category: self.category,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL notification repository implementation.
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    /// Persist an announcement and fan it out to every current housing
    /// assignment of its house.
    ///
    /// Both inserts run in one transaction so a failed fan-out never leaves
    /// an orphaned announcement behind.
    async fn deliver_to_house(
        &self,
        notification: &Notification,
    ) -> Result<DeliveredNotification, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (id, house_id, alert, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, house_id, alert, category, created_at
            "#,
        )
        .bind(notification.id)
        .bind(notification.house_id)
        .bind(&notification.alert)
        .bind(&notification.category)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(format!("House {} not found", notification.house_id))
            }
            _ => AppError::Database(e),
        })?;

        // One inbox row per housemate currently assigned to the house
        let result = sqlx::query(
            r#"
            INSERT INTO user_notifications (user_id, notification_id)
            SELECT user_id, $2
            FROM housing_assignments
            WHERE house_id = $1
            "#,
        )
        .bind(notification.house_id)
        .bind(notification.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let recipients = result.rows_affected();
        metrics::record_notification_fanout(&notification.category, recipients);

        Ok(DeliveredNotification {
            notification: row.into_notification(),
            recipients,
        })
    }
}
