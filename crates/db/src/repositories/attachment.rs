//! Attachment keys stored on expenses, documents, outcomes and academic
//! activities.

use fundtrack_core::attachment::{
    AttachmentError, AttachmentKind, AttachmentRepository as AttachmentRepoTrait, AttachmentSlot,
};
use fundtrack_shared::types::{AcademicActivityId, DocumentId, ExpenseId, OutcomeId, ProjectId};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use super::academic::AcademicActivityRepository;
use super::document::DocumentRepository;
use super::expense::ExpenseRepository;
use super::outcome::OutcomeRepository;
use crate::entities::{academic_activities, expenses, project_documents, project_outcomes};
use crate::error::RepositoryError;

/// Looks up and records attachment keys for every attachment kind.
///
/// Changes to project-scoped records are logged under `operator`.
#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    db: DatabaseConnection,
    operator: String,
}

impl AttachmentRepository {
    /// Creates a new attachment repository acting for `operator`.
    #[must_use]
    pub fn new(db: DatabaseConnection, operator: impl Into<String>) -> Self {
        Self {
            db,
            operator: operator.into(),
        }
    }

    async fn find_slot(
        &self,
        kind: AttachmentKind,
        item_id: Uuid,
    ) -> Result<Option<AttachmentSlot>, RepositoryError> {
        let slot = match kind {
            AttachmentKind::Voucher => expenses::Entity::find_by_id(item_id)
                .one(&self.db)
                .await?
                .map(|m| slot(Some(m.project_id), m.voucher_key)),
            AttachmentKind::Document => project_documents::Entity::find_by_id(item_id)
                .one(&self.db)
                .await?
                .map(|m| slot(Some(m.project_id), m.file_key)),
            AttachmentKind::Outcome => project_outcomes::Entity::find_by_id(item_id)
                .one(&self.db)
                .await?
                .map(|m| slot(Some(m.project_id), m.attachment_key)),
            AttachmentKind::Activity => academic_activities::Entity::find_by_id(item_id)
                .one(&self.db)
                .await?
                .map(|m| slot(None, m.attachment_key)),
        };
        Ok(slot)
    }

    async fn write_key(
        &self,
        kind: AttachmentKind,
        item_id: Uuid,
        key: Option<String>,
    ) -> Result<(), RepositoryError> {
        let db = self.db.clone();
        match kind {
            AttachmentKind::Voucher => {
                ExpenseRepository::new(db)
                    .set_voucher(ExpenseId::from_uuid(item_id), key, &self.operator)
                    .await?;
            }
            AttachmentKind::Document => {
                DocumentRepository::new(db)
                    .set_file(DocumentId::from_uuid(item_id), key, &self.operator)
                    .await?;
            }
            AttachmentKind::Outcome => {
                OutcomeRepository::new(db)
                    .set_attachment(OutcomeId::from_uuid(item_id), key, &self.operator)
                    .await?;
            }
            AttachmentKind::Activity => {
                AcademicActivityRepository::new(db)
                    .set_attachment(AcademicActivityId::from_uuid(item_id), key)
                    .await?;
            }
        }
        Ok(())
    }
}

fn slot(project_id: Option<Uuid>, current_key: Option<String>) -> AttachmentSlot {
    AttachmentSlot {
        project_id: project_id.map(ProjectId::from_uuid),
        current_key,
    }
}

impl AttachmentRepoTrait for AttachmentRepository {
    async fn locate(
        &self,
        kind: AttachmentKind,
        item_id: Uuid,
    ) -> Result<Option<AttachmentSlot>, AttachmentError> {
        self.find_slot(kind, item_id)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))
    }

    async fn set_key(
        &self,
        kind: AttachmentKind,
        item_id: Uuid,
        key: Option<String>,
    ) -> Result<(), AttachmentError> {
        match self.write_key(kind, item_id, key).await {
            Err(RepositoryError::NotFound { .. }) => {
                Err(AttachmentError::NotFound { kind, id: item_id })
            }
            other => other.map_err(|e| AttachmentError::repository(e.to_string())),
        }
    }
}
