//! Attachment files for expenses (vouchers), documents, outcomes and
//! academic activities.
//!
//! Each record holds at most one file. The record stores the storage key;
//! the bytes live in [`crate::storage`].

mod error;
mod service;
mod types;

pub use error::AttachmentError;
pub use service::{AttachmentRepository, AttachmentService};
pub use types::{AttachmentKind, AttachmentSlot, StoredFile, content_type_for, storage_key};
