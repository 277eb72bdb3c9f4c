//! Attachment error types.

use fundtrack_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use super::types::AttachmentKind;
use crate::storage::StorageError;

/// Attachment operation errors.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// The owning record does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Record kind.
        kind: AttachmentKind,
        /// Record ID.
        id: Uuid,
    },

    /// The record exists but has no file.
    #[error("{kind} {id} has no attachment")]
    NoAttachment {
        /// Record kind.
        kind: AttachmentKind,
        /// Record ID.
        id: Uuid,
    },

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AttachmentError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<AttachmentError> for AppError {
    fn from(err: AttachmentError) -> Self {
        match err {
            AttachmentError::NotFound { .. } | AttachmentError::NoAttachment { .. } => {
                Self::NotFound(err.to_string())
            }
            AttachmentError::Storage(inner) => inner.into(),
            AttachmentError::Repository(msg) => Self::Database(msg),
        }
    }
}
