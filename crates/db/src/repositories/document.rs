//! Project document repository.

use chrono::Utc;
use fundtrack_core::audit::{ActionKind, ActivityEntry, EntityKind};
use fundtrack_core::records::{DocumentInput, DocumentType, ProjectDocument, RecordFilter};
use fundtrack_shared::types::{DocumentId, ProjectId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::activity_log::ActivityLogRepository;
use super::project::load_project;
use crate::codec::decode;
use crate::entities::project_documents;
use crate::error::RepositoryError;

/// Document repository.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Documents of a project matching `filter`, newest first.
    pub async fn list(
        &self,
        project_id: ProjectId,
        filter: &RecordFilter,
    ) -> Result<Vec<ProjectDocument>, RepositoryError> {
        load_project(&self.db, project_id).await?;
        let models = project_documents::Entity::find()
            .filter(project_documents::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_desc(project_documents::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let documents = models
            .into_iter()
            .map(into_document)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(filter.apply(documents))
    }

    /// Gets a document by ID.
    pub async fn get(&self, id: DocumentId) -> Result<ProjectDocument, RepositoryError> {
        into_document(load_document(&self.db, id).await?).map_err(Into::into)
    }

    /// Registers a document. The file itself is uploaded separately.
    pub async fn create(
        &self,
        project_id: ProjectId,
        input: DocumentInput,
        operator: &str,
    ) -> Result<ProjectDocument, RepositoryError> {
        let input = input.normalize()?;

        let txn = self.db.begin().await?;
        load_project(&txn, project_id).await?;
        let now = Utc::now();
        let model = project_documents::ActiveModel {
            id: Set(DocumentId::new().into_inner()),
            project_id: Set(project_id.into_inner()),
            name: Set(input.name),
            doc_type: Set(input.doc_type.as_str().to_string()),
            version: Set(input.version),
            description: Set(input.description),
            keywords: Set(input.keywords),
            uploader: Set(input.uploader),
            upload_time: Set(None),
            file_key: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        let document = into_document(model)?;

        let entry = ActivityEntry::new(
            EntityKind::Document,
            ActionKind::Create,
            format!("registered document '{}'", document.name),
        )
        .project(project_id)
        .by(operator)
        .after(&document);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(document)
    }

    /// Replaces a document's descriptive fields.
    pub async fn update(
        &self,
        id: DocumentId,
        input: DocumentInput,
        operator: &str,
    ) -> Result<ProjectDocument, RepositoryError> {
        let input = input.normalize()?;

        let txn = self.db.begin().await?;
        let model = load_document(&txn, id).await?;
        let before = into_document(model.clone())?;

        let mut active: project_documents::ActiveModel = model.into();
        active.name = Set(input.name);
        active.doc_type = Set(input.doc_type.as_str().to_string());
        active.version = Set(input.version);
        active.description = Set(input.description);
        active.keywords = Set(input.keywords);
        active.uploader = Set(input.uploader);
        active.updated_at = Set(Utc::now());
        let after = into_document(active.update(&txn).await?)?;

        let entry = ActivityEntry::new(
            EntityKind::Document,
            ActionKind::Update,
            format!("updated document '{}'", after.name),
        )
        .project(after.project_id)
        .by(operator)
        .before(&before)
        .after(&after);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(after)
    }

    /// Deletes a document, returning its file key.
    pub async fn delete(
        &self,
        id: DocumentId,
        operator: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let txn = self.db.begin().await?;
        let before = into_document(load_document(&txn, id).await?)?;
        project_documents::Entity::delete_by_id(id.into_inner()).exec(&txn).await?;

        let entry = ActivityEntry::new(
            EntityKind::Document,
            ActionKind::Delete,
            format!("deleted document '{}'", before.name),
        )
        .project(before.project_id)
        .by(operator)
        .before(&before);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(before.file_key)
    }

    /// Records or clears the file key. Storing a file stamps the upload time.
    pub async fn set_file(
        &self,
        id: DocumentId,
        key: Option<String>,
        operator: &str,
    ) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let model = load_document(&txn, id).await?;
        let before = into_document(model.clone())?;
        let now = Utc::now();
        let mut active: project_documents::ActiveModel = model.into();
        active.upload_time = Set(key.is_some().then_some(now));
        active.file_key = Set(key);
        active.updated_at = Set(now);
        let after = into_document(active.update(&txn).await?)?;

        let action = if after.file_key.is_some() {
            "attached file to"
        } else {
            "removed file from"
        };
        let entry = ActivityEntry::new(
            EntityKind::Document,
            ActionKind::Update,
            format!("{action} document '{}'", after.name),
        )
        .project(after.project_id)
        .by(operator)
        .before(&before)
        .after(&after);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(())
    }
}

async fn load_document<C: ConnectionTrait>(
    conn: &C,
    id: DocumentId,
) -> Result<project_documents::Model, RepositoryError> {
    project_documents::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("document", id.into_inner()))
}

fn into_document(model: project_documents::Model) -> Result<ProjectDocument, DbErr> {
    Ok(ProjectDocument {
        id: DocumentId::from_uuid(model.id),
        project_id: ProjectId::from_uuid(model.project_id),
        name: model.name,
        doc_type: decode("doc_type", &model.doc_type, DocumentType::parse)?,
        version: model.version,
        description: model.description,
        keywords: model.keywords,
        uploader: model.uploader,
        upload_time: model.upload_time,
        file_key: model.file_key,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
