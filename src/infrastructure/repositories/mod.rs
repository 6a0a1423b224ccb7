//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! This module provides concrete implementations of the repository traits
//! defined in the domain layer. Each repository handles data access for
//! a specific entity type.
//!
//! ## Available Repositories
//!
//! - **UserRepository** - Resident account management
//! - **HouseRepository** - House lookups
//! - **HousingAssignmentRepository** - Residency and membership checks
//! - **RuleRepository** - House rule CRUD
//! - **NotificationRepository** - Announcement storage with housemate fan-out
//! - **SessionRepository** - Refresh token sessions
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{
//!     PgHouseRepository, PgRuleRepository, PgUserRepository,
//! };
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let user_repo = PgUserRepository::new(pool.clone());
//!     let house_repo = PgHouseRepository::new(pool.clone());
//!     let rule_repo = PgRuleRepository::new(pool.clone());
//! }
//! ```

// Core repositories
pub mod house_repository;
pub mod housing_assignment_repository;
pub mod notification_repository;
pub mod rule_repository;
pub mod user_repository;

// Additional repositories
pub mod session_repository;

// Re-export repository structs for convenience
pub use house_repository::PgHouseRepository;
pub use housing_assignment_repository::PgHousingAssignmentRepository;
pub use notification_repository::PgNotificationRepository;
pub use rule_repository::PgRuleRepository;
pub use session_repository::PgSessionRepository;
pub use user_repository::PgUserRepository;
