//! Shared types, errors, and configuration for Fundtrack.
//!
//! This crate provides common types used across all other crates:
//! - Money stored as exact fen with yuan / wan conversions
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
