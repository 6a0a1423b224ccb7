//! # Housemate Server Library
//!
//! This crate provides the backend for a shared-household management app:
//! - RESTful HTTP API endpoints
//! - Browser-facing pages for house rules with redirect-based navigation
//! - House rule management with housemate notifications
//! - PostgreSQL for persistent storage
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database and metrics implementations
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! housemate_server/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities and traits
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Database and metrics implementations
//! +-- presentation/  HTTP routes, handlers and middleware
//! +-- shared/        Common utilities (errors, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers and middleware
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
