//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a registered resident account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - first_name: VARCHAR(50) NOT NULL
/// - last_name: VARCHAR(50) NOT NULL
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Given name, used when addressing housemates in notifications
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address (unique)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Get the user's full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Create a new user in the database.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User {
            id: 12345678901234567,
            first_name: "Rosa".to_string(),
            last_name: "Diaz".to_string(),
            email: "rosa@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_default() {
        let user = User::default();

        assert_eq!(user.id, 0);
        assert!(user.first_name.is_empty());
        assert!(user.last_name.is_empty());
        assert!(user.email.is_empty());
        assert!(user.password_hash.is_empty());
    }

    #[test]
    fn test_user_full_name() {
        let user = create_test_user();

        assert_eq!(user.full_name(), "Rosa Diaz");
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = create_test_user();

        let serialized = serde_json::to_string(&user).expect("Failed to serialize user");

        // password_hash should not appear in serialized output
        assert!(!serialized.contains("password_hash"));
        assert!(!serialized.contains("hashed_password"));
    }

    #[test]
    fn test_user_serialization_includes_required_fields() {
        let user = create_test_user();

        let serialized = serde_json::to_string(&user).expect("Failed to serialize user");

        assert!(serialized.contains("\"id\":12345678901234567"));
        assert!(serialized.contains("\"first_name\":\"Rosa\""));
        assert!(serialized.contains("\"email\":\"rosa@example.com\""));
    }

    #[test]
    fn test_user_clone() {
        let user = create_test_user();
        let cloned = user.clone();

        assert_eq!(user.id, cloned.id);
        assert_eq!(user.email, cloned.email);
        assert_eq!(user.first_name, cloned.first_name);
    }
}
