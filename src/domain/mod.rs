//! # Domain Layer
//!
//! The domain layer contains the core business logic of the household server.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, House, Rule, Notification, etc.)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Pure business logic and domain rules
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;

// Re-export commonly used types
pub use entities::*;
