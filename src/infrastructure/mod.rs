//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL)
//! - Prometheus metrics collection

pub mod database;
pub mod metrics;
pub mod repositories;
