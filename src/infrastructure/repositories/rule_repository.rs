//! Rule Repository Implementation
//!
//! PostgreSQL implementation of house rule storage.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Rule, RuleRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// PostgreSQL rule repository implementation.
pub struct PgRuleRepository {
    pool: PgPool,
}

impl PgRuleRepository {
    /// Creates a new PgRuleRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for rule queries.
/// Maps to the rules table schema defined in the migration.
#[derive(Debug, sqlx::FromRow)]
struct RuleRow {
    id: i64,
    house_id: i64,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RuleRow {
    /// Converts database row to domain Rule entity.
    fn into_rule(self) -> Rule {
        Rule {
            id: self.id,
            house_id: self.house_id,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[async_trait]
impl RuleRepository for PgRuleRepository {
    /// Find a rule by its ID.
    ///
    /// Returns None if the rule does not exist.
    async fn find_by_id(&self, id: i64) -> Result<Option<Rule>, AppError> {
        let start = Instant::now();
        let row = sqlx::query_as::<_, RuleRow>(
            r#"
            SELECT id, house_id, content, created_at, updated_at
            FROM rules
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        metrics::record_db_query("select", "rules", start.elapsed().as_secs_f64());

        Ok(row.map(|r| r.into_rule()))
    }

    /// Find all rules of a house, oldest first.
    ///
    /// Snowflake IDs are time-ordered, so ordering by id matches the order
    /// the rules were added in.
    async fn find_by_house(&self, house_id: i64) -> Result<Vec<Rule>, AppError> {
        let start = Instant::now();
        let rows = sqlx::query_as::<_, RuleRow>(
            r#"
            SELECT id, house_id, content, created_at, updated_at
            FROM rules
            WHERE house_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(house_id)
        .fetch_all(&self.pool)
        .await?;
        metrics::record_db_query("select", "rules", start.elapsed().as_secs_f64());

        Ok(rows.into_iter().map(|r| r.into_rule()).collect())
    }

    /// Create a new rule.
    ///
    /// The rule ID should be a pre-generated Snowflake ID from the application layer.
    async fn create(&self, rule: &Rule) -> Result<Rule, AppError> {
        let start = Instant::now();
        let row = sqlx::query_as::<_, RuleRow>(
            r#"
            INSERT INTO rules (id, house_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, house_id, content, created_at, updated_at
            "#,
        )
        .bind(rule.id)
        .bind(rule.house_id)
        .bind(&rule.content)
        .fetch_one(&self.pool)
        .await?;
        metrics::record_db_query("insert", "rules", start.elapsed().as_secs_f64());

        Ok(row.into_rule())
    }

    /// Update a rule's content.
    ///
    /// The updated_at timestamp is bumped automatically.
    async fn update(&self, rule: &Rule) -> Result<Rule, AppError> {
        let start = Instant::now();
        let row = sqlx::query_as::<_, RuleRow>(
            r#"
            UPDATE rules
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, house_id, content, created_at, updated_at
            "#,
        )
        .bind(rule.id)
        .bind(&rule.content)
        .fetch_optional(&self.pool)
        .await?;
        metrics::record_db_query("update", "rules", start.elapsed().as_secs_f64());

        row.map(|r| r.into_rule())
            .ok_or_else(|| AppError::NotFound(format!("Rule {} not found", rule.id)))
    }

    /// Delete a rule.
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let start = Instant::now();
        let result = sqlx::query("DELETE FROM rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        metrics::record_db_query("delete", "rules", start.elapsed().as_secs_f64());

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Rule {} not found", id)));
        }

        Ok(())
    }
}
