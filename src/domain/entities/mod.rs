//! # Domain Entities
//!
//! Core domain entities representing the main business objects in the
//! household server. All entities map directly to their corresponding
//! database tables.
//!
//! ## Core Entities
//!
//! - **User**: Resident account with authentication data
//! - **House**: A shared household, the tenancy boundary for everything else
//! - **HousingAssignment**: A user's residency in a specific house
//! - **Rule**: A house rule agreed on by the housemates
//! - **Notification**: A house-wide announcement fanned out to housemates
//!
//! ## Supporting Entities
//!
//! - **Session**: User sessions for JWT refresh token management
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod house;
mod housing_assignment;
mod notification;
mod rule;
mod session;
mod user;

// Re-export User entity and related types
pub use user::{User, UserRepository};

// Re-export House entity and related types
pub use house::{House, HouseRepository};

// Re-export HousingAssignment entity and related types
pub use housing_assignment::{HousingAssignment, HousingAssignmentRepository};

// Re-export Rule entity and related types
pub use rule::{Rule, RuleRepository, MAX_CONTENT_CHARS, MIN_CONTENT_CHARS};

// Re-export Notification entity and related types
pub use notification::{
    DeliveredNotification, Notification, NotificationRepository, CATEGORY_RULES,
};

// Re-export Session entity and related types
pub use session::{Session, SessionRepository};
