//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Authentication, JWT tokens, password management
//! - **UserService**: Current-user profile and house membership
//! - **RuleService**: House rule CRUD and housemate announcements

pub mod auth_service;
pub mod rule_service;
pub mod user_service;

// Re-export auth service types
pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthTokens, Claims};

// Re-export user service types
pub use user_service::{HousePreviewDto, UserDto, UserError, UserService, UserServiceImpl};

// Re-export rule service types
pub use rule_service::{RuleDto, RuleError, RuleListing, RuleService, RuleServiceImpl};
