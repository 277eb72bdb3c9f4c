//! Attachment service implementation.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use super::error::AttachmentError;
use super::types::{AttachmentKind, AttachmentSlot, StoredFile, content_type_for, storage_key};
use crate::storage::StorageService;

/// Repository trait for locating records and recording their keys.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AttachmentRepository: Send + Sync {
    /// Finds the record, or `None` if it does not exist.
    fn locate(
        &self,
        kind: AttachmentKind,
        item_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<AttachmentSlot>, AttachmentError>> + Send;

    /// Stores or clears the record's key.
    fn set_key(
        &self,
        kind: AttachmentKind,
        item_id: Uuid,
        key: Option<String>,
    ) -> impl std::future::Future<Output = Result<(), AttachmentError>> + Send;
}

/// Attachment service for managing file attachments.
pub struct AttachmentService<R: AttachmentRepository> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
}

impl<R: AttachmentRepository> AttachmentService<R> {
    /// Create a new attachment service.
    #[must_use]
    pub const fn new(storage: Arc<StorageService>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    async fn slot(
        &self,
        kind: AttachmentKind,
        item_id: Uuid,
    ) -> Result<AttachmentSlot, AttachmentError> {
        self.repo
            .locate(kind, item_id)
            .await?
            .ok_or(AttachmentError::NotFound { kind, id: item_id })
    }

    /// Stores `data` as the record's attachment and returns the new key.
    ///
    /// A previous file under a different key is deleted afterwards; failing
    /// to delete it is logged, not returned.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown record, storage or repository failures.
    pub async fn upload(
        &self,
        kind: AttachmentKind,
        item_id: Uuid,
        filename: &str,
        data: Bytes,
    ) -> Result<String, AttachmentError> {
        self.storage.validate_upload(data.len() as u64)?;
        let slot = self.slot(kind, item_id).await?;
        let key = storage_key(kind, slot.project_id, item_id, filename);

        self.storage.put(&key, data).await?;
        if let Err(e) = self.repo.set_key(kind, item_id, Some(key.clone())).await {
            if slot.current_key.as_deref() != Some(key.as_str()) {
                self.discard(&key).await;
            }
            return Err(e);
        }

        if let Some(old) = slot.current_key.filter(|old| *old != key) {
            self.discard(&old).await;
        }
        tracing::info!(%kind, %item_id, key = %key, "attachment stored");
        Ok(key)
    }

    /// Reads the record's attachment.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown record, `NoAttachment` when none is set.
    pub async fn download(
        &self,
        kind: AttachmentKind,
        item_id: Uuid,
    ) -> Result<StoredFile, AttachmentError> {
        let key = self
            .slot(kind, item_id)
            .await?
            .current_key
            .ok_or(AttachmentError::NoAttachment { kind, id: item_id })?;
        let data = self.storage.read(&key).await?;
        let filename = key.rsplit('/').next().unwrap_or(key.as_str()).to_string();
        Ok(StoredFile {
            content_type: content_type_for(&filename),
            filename,
            key,
            data,
        })
    }

    /// Detaches and deletes the record's attachment.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown record, `NoAttachment` when none is set.
    pub async fn remove(&self, kind: AttachmentKind, item_id: Uuid) -> Result<(), AttachmentError> {
        let key = self
            .slot(kind, item_id)
            .await?
            .current_key
            .ok_or(AttachmentError::NoAttachment { kind, id: item_id })?;
        self.repo.set_key(kind, item_id, None).await?;
        self.discard(&key).await;
        Ok(())
    }

    /// Deletes files whose records are already gone.
    pub async fn purge<I>(&self, keys: I)
    where
        I: IntoIterator<Item = String>,
    {
        for key in keys {
            self.discard(&key).await;
        }
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(key, error = %e, "failed to delete attachment file");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use fundtrack_shared::types::ProjectId;

    use super::*;
    use crate::storage::{StorageConfig, StorageError};

    #[derive(Default)]
    struct MemoryRepo {
        slots: Mutex<HashMap<Uuid, AttachmentSlot>>,
    }

    impl MemoryRepo {
        fn with(item_id: Uuid, project_id: Option<ProjectId>) -> Self {
            let repo = Self::default();
            repo.slots.lock().unwrap().insert(
                item_id,
                AttachmentSlot {
                    project_id,
                    current_key: None,
                },
            );
            repo
        }

        fn key(&self, item_id: Uuid) -> Option<String> {
            self.slots.lock().unwrap()[&item_id].current_key.clone()
        }
    }

    impl AttachmentRepository for MemoryRepo {
        async fn locate(
            &self,
            _kind: AttachmentKind,
            item_id: Uuid,
        ) -> Result<Option<AttachmentSlot>, AttachmentError> {
            Ok(self.slots.lock().unwrap().get(&item_id).cloned())
        }

        async fn set_key(
            &self,
            _kind: AttachmentKind,
            item_id: Uuid,
            key: Option<String>,
        ) -> Result<(), AttachmentError> {
            let mut slots = self.slots.lock().unwrap();
            let slot = slots
                .get_mut(&item_id)
                .ok_or_else(|| AttachmentError::repository("gone"))?;
            slot.current_key = key;
            Ok(())
        }
    }

    fn service(
        repo: MemoryRepo) -> (AttachmentService<MemoryRepo>, Arc<StorageService>, Arc<MemoryRepo>,
    ) {
        let storage = Arc::new(
            StorageService::from_config(StorageConfig::memory().with_max_file_size(1024)).unwrap(),
        );
        let repo = Arc::new(repo);
        (
            AttachmentService::new(Arc::clone(&storage), Arc::clone(&repo)),
            storage,
            repo,
        )
    }

    #[tokio::test]
    async fn test_upload_download_remove() {
        let item = Uuid::now_v7();
        let project = ProjectId::new();
        let (service, storage, repo) = service(MemoryRepo::with(item, Some(project)));

        let key = service
            .upload(AttachmentKind::Voucher, item, "scan.pdf", Bytes::from_static(b"pdf"))
            .await
            .unwrap();
        assert!(key.starts_with(&format!("vouchers/{project}/{item}/voucher_{item}_scan")));
        assert_eq!(repo.key(item), Some(key.clone()));

        let file = service.download(AttachmentKind::Voucher, item).await.unwrap();
        assert_eq!(file.data, Bytes::from_static(b"pdf"));
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.filename, format!("voucher_{item}_scan.pdf"));

        service.remove(AttachmentKind::Voucher, item).await.unwrap();
        assert_eq!(repo.key(item), None);
        assert!(!storage.exists(&key).await);
        assert!(matches!(
            service.download(AttachmentKind::Voucher, item).await,
            Err(AttachmentError::NoAttachment { .. })
        ));
    }

    #[tokio::test]
    async fn test_replacing_deletes_previous_file() {
        let item = Uuid::now_v7();
        let (service, storage, repo) = service(MemoryRepo::with(item, None));

        let first = service
            .upload(AttachmentKind::Activity, item, "agenda.docx", Bytes::from_static(b"v1"))
            .await
            .unwrap();
        let second = service
            .upload(AttachmentKind::Activity, item, "photos.zip", Bytes::from_static(b"v2"))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert!(second.starts_with("activities/shared/"));
        assert!(!storage.exists(&first).await);
        assert!(storage.exists(&second).await);
        assert_eq!(repo.key(item), Some(second));
    }

    #[tokio::test]
    async fn test_same_name_overwrites_in_place() {
        let item = Uuid::now_v7();
        let (service, storage, _) = service(MemoryRepo::with(item, None));

        let first = service
            .upload(AttachmentKind::Document, item, "plan.pdf", Bytes::from_static(b"v1"))
            .await
            .unwrap();
        let second = service
            .upload(AttachmentKind::Document, item, "plan.pdf", Bytes::from_static(b"v2"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(storage.read(&second).await.unwrap(), Bytes::from_static(b"v2"));
    }

    #[tokio::test]
    async fn test_unknown_record_and_limits() {
        let item = Uuid::now_v7();
        let (service, _, _) = service(MemoryRepo::default());

        assert!(matches!(
            service
                .upload(AttachmentKind::Outcome, item, "a.pdf", Bytes::from_static(b"x"))
                .await,
            Err(AttachmentError::NotFound { .. })
        ));
        assert!(matches!(
            service
                .upload(AttachmentKind::Outcome, item, "a.pdf", Bytes::from(vec![0u8; 2048]))
                .await,
            Err(AttachmentError::Storage(StorageError::FileTooLarge { .. }))
        ));
        assert!(matches!(
            service.remove(AttachmentKind::Outcome, item).await,
            Err(AttachmentError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_purge_ignores_missing_files() {
        let item = Uuid::now_v7();
        let (service, storage, _) = service(MemoryRepo::with(item, None));
        let key = service
            .upload(AttachmentKind::Document, item, "a.txt", Bytes::from_static(b"a"))
            .await
            .unwrap();

        service.purge(vec![key.clone(), "documents/none/missing.txt".to_string()]).await;
        assert!(!storage.exists(&key).await);
    }
}
