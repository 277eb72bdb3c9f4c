//! Project outcome repository.

use chrono::Utc;
use fundtrack_core::audit::{ActionKind, ActivityEntry, EntityKind};
use fundtrack_core::records::{
    OutcomeInput, OutcomeStatus, OutcomeType, ProjectOutcome, RecordFilter,
};
use fundtrack_shared::types::{OutcomeId, ProjectId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::activity_log::ActivityLogRepository;
use super::project::load_project;
use crate::codec::decode;
use crate::entities::project_outcomes;
use crate::error::RepositoryError;

/// Outcome repository.
#[derive(Debug, Clone)]
pub struct OutcomeRepository {
    db: DatabaseConnection,
}

impl OutcomeRepository {
    /// Creates a new outcome repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Outcomes of a project matching `filter`, newest first.
    pub async fn list(
        &self,
        project_id: ProjectId,
        filter: &RecordFilter,
    ) -> Result<Vec<ProjectOutcome>, RepositoryError> {
        load_project(&self.db, project_id).await?;
        let models = project_outcomes::Entity::find()
            .filter(project_outcomes::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_desc(project_outcomes::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let outcomes = models
            .into_iter()
            .map(into_outcome)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(filter.apply(outcomes))
    }

    /// Gets an outcome by ID.
    pub async fn get(&self, id: OutcomeId) -> Result<ProjectOutcome, RepositoryError> {
        into_outcome(load_outcome(&self.db, id).await?).map_err(Into::into)
    }

    /// Records a new outcome.
    pub async fn create(
        &self,
        project_id: ProjectId,
        input: OutcomeInput,
        operator: &str,
    ) -> Result<ProjectOutcome, RepositoryError> {
        let input = input.normalize()?;

        let txn = self.db.begin().await?;
        load_project(&txn, project_id).await?;
        let now = Utc::now();
        let model = project_outcomes::ActiveModel {
            id: Set(OutcomeId::new().into_inner()),
            project_id: Set(project_id.into_inner()),
            outcome_type: Set(input.outcome_type.as_str().to_string()),
            name: Set(input.name),
            status: Set(input.status.as_str().to_string()),
            authors: Set(input.authors),
            submit_date: Set(input.submit_date),
            publish_date: Set(input.publish_date),
            journal: Set(input.journal),
            description: Set(input.description),
            remarks: Set(input.remarks),
            attachment_key: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        let outcome = into_outcome(model)?;

        let entry = ActivityEntry::new(
            EntityKind::Outcome,
            ActionKind::Create,
            format!("recorded {} '{}'", outcome.outcome_type, outcome.name),
        )
        .project(project_id)
        .by(operator)
        .after(&outcome);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(outcome)
    }

    /// Replaces an outcome's fields. The attachment stays.
    pub async fn update(
        &self,
        id: OutcomeId,
        input: OutcomeInput,
        operator: &str,
    ) -> Result<ProjectOutcome, RepositoryError> {
        let input = input.normalize()?;

        let txn = self.db.begin().await?;
        let model = load_outcome(&txn, id).await?;
        let before = into_outcome(model.clone())?;

        let mut active: project_outcomes::ActiveModel = model.into();
        active.outcome_type = Set(input.outcome_type.as_str().to_string());
        active.name = Set(input.name);
        active.status = Set(input.status.as_str().to_string());
        active.authors = Set(input.authors);
        active.submit_date = Set(input.submit_date);
        active.publish_date = Set(input.publish_date);
        active.journal = Set(input.journal);
        active.description = Set(input.description);
        active.remarks = Set(input.remarks);
        active.updated_at = Set(Utc::now());
        let after = into_outcome(active.update(&txn).await?)?;

        let entry = ActivityEntry::new(
            EntityKind::Outcome,
            ActionKind::Update,
            format!("updated {} '{}'", after.outcome_type, after.name),
        )
        .project(after.project_id)
        .by(operator)
        .before(&before)
        .after(&after);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(after)
    }

    /// Deletes an outcome, returning its attachment key.
    pub async fn delete(
        &self,
        id: OutcomeId,
        operator: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let txn = self.db.begin().await?;
        let model = load_outcome(&txn, id).await?;
        let before = into_outcome(model)?;
        project_outcomes::Entity::delete_by_id(id.into_inner()).exec(&txn).await?;

        let entry = ActivityEntry::new(
            EntityKind::Outcome,
            ActionKind::Delete,
            format!("deleted {} '{}'", before.outcome_type, before.name),
        )
        .project(before.project_id)
        .by(operator)
        .before(&before);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(before.attachment_key)
    }

    /// Records or clears the attachment key.
    pub async fn set_attachment(
        &self,
        id: OutcomeId,
        key: Option<String>,
        operator: &str,
    ) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let model = load_outcome(&txn, id).await?;
        let before = into_outcome(model.clone())?;
        let mut active: project_outcomes::ActiveModel = model.into();
        active.attachment_key = Set(key);
        active.updated_at = Set(Utc::now());
        let after = into_outcome(active.update(&txn).await?)?;

        let action = if after.attachment_key.is_some() {
            "attached file to"
        } else {
            "removed file from"
        };
        let entry = ActivityEntry::new(
            EntityKind::Outcome,
            ActionKind::Update,
            format!("{action} {} '{}'", after.outcome_type, after.name),
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

async fn load_outcome<C: ConnectionTrait>(
    conn: &C,
    id: OutcomeId,
) -> Result<project_outcomes::Model, RepositoryError> {
    project_outcomes::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("outcome", id.into_inner()))
}

fn into_outcome(model: project_outcomes::Model) -> Result<ProjectOutcome, DbErr> {
    Ok(ProjectOutcome {
        id: OutcomeId::from_uuid(model.id),
        project_id: ProjectId::from_uuid(model.project_id),
        outcome_type: decode("outcome_type", &model.outcome_type, OutcomeType::parse)?,
        name: model.name,
        status: decode("status", &model.status, OutcomeStatus::parse)?,
        authors: model.authors,
        submit_date: model.submit_date,
        publish_date: model.publish_date,
        journal: model.journal,
        description: model.description,
        remarks: model.remarks,
        attachment_key: model.attachment_key,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
