//! Integration Tests Entry Point
//!
//! Tests are organized by module:
//! - `api/` - REST API endpoint tests driven through the real router
//! - `common/` - Shared test utilities

mod api;
mod common;

// Re-export common utilities for tests
pub use common::*;
