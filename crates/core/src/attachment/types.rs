//! Attachment types and key layout.

use std::path::Path;

use bytes::Bytes;
use fundtrack_shared::types::ProjectId;
use uuid::Uuid;

use crate::storage::sanitize_stem;

/// Record kinds that can carry a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Expense voucher scan.
    Voucher,
    /// Project document file.
    Document,
    /// Outcome proof (paper PDF, patent certificate).
    Outcome,
    /// Academic activity material.
    Activity,
}

impl AttachmentKind {
    /// Top-level folder in storage.
    #[must_use]
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Voucher => "vouchers",
            Self::Document => "documents",
            Self::Outcome => "outcomes",
            Self::Activity => "activities",
        }
    }

    /// File name prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Voucher => "voucher",
            Self::Document => "document",
            Self::Outcome => "outcome",
            Self::Activity => "activity",
        }
    }
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Voucher => "expense",
            Self::Document => "document",
            Self::Outcome => "outcome",
            Self::Activity => "academic activity",
        };
        f.write_str(name)
    }
}

/// Where a record's attachment hangs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSlot {
    /// Owning project; `None` for records outside any project.
    pub project_id: Option<ProjectId>,
    /// Key of the current file, if any.
    pub current_key: Option<String>,
}

/// A file read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Storage key.
    pub key: String,
    /// File name for downloads.
    pub filename: String,
    /// MIME type guessed from the extension.
    pub content_type: &'static str,
    /// Contents.
    pub data: Bytes,
}

/// Builds the storage key for an uploaded file.
///
/// Format: `{folder}/{project_id|shared}/{item_id}/{prefix}_{item_id}_{stem}{.ext}`.
#[must_use]
pub fn storage_key(
    kind: AttachmentKind,
    project_id: Option<ProjectId>,
    item_id: Uuid,
    filename: &str,
) -> String {
    let path = Path::new(filename);
    let stem = sanitize_stem(
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default(),
    );
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let owner = project_id.map_or_else(|| "shared".to_string(), |id| id.to_string());

    format!(
        "{}/{owner}/{item_id}/{}_{item_id}_{stem}{ext}",
        kind.folder(),
        kind.prefix(),
    )
}

/// MIME type for a key or file name, by extension.
#[must_use]
pub fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (ProjectId, Uuid) {
        (
            ProjectId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()),
            Uuid::parse_str("6ba7b811-9dad-11d1-80b4-00c04fd430c8").unwrap(),
        )
    }

    #[test]
    fn test_voucher_key() {
        let (project, item) = ids();
        assert_eq!(
            storage_key(AttachmentKind::Voucher, Some(project), item, "March receipt.PDF"),
            "vouchers/550e8400-e29b-41d4-a716-446655440000/6ba7b811-9dad-11d1-80b4-00c04fd430c8/\
             voucher_6ba7b811-9dad-11d1-80b4-00c04fd430c8_Marchreceipt.pdf"
        );
    }

    #[test]
    fn test_shared_key_and_odd_names() {
        let (_, item) = ids();
        let key = storage_key(AttachmentKind::Activity, None, item, "会议通知");
        assert!(key.starts_with("activities/shared/"));
        assert!(key.ends_with("_file"));

        let key = storage_key(AttachmentKind::Document, None, item, "../../etc/passwd");
        assert_eq!(key.matches('/').count(), 3);
        assert!(key.ends_with("_passwd"));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a/b/voucher_x_scan.pdf"), "application/pdf");
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
