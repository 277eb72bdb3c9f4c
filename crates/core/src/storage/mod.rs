//! Attachment file storage on Apache OpenDAL.
//!
//! Production uses the local filesystem under a configured root; tests use
//! the in-memory service.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{StorageService, sanitize_stem};
