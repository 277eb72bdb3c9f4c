//! Academic activity repository. Activities are not tied to a project.

use chrono::Utc;
use fundtrack_core::records::{
    AcademicActivity, AcademicActivityInput, ActivityStatus, ActivityType, RecordFilter,
};
use fundtrack_shared::types::AcademicActivityId;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};

use crate::codec::decode;
use crate::entities::academic_activities;
use crate::error::RepositoryError;

/// Academic activity repository.
#[derive(Debug, Clone)]
pub struct AcademicActivityRepository {
    db: DatabaseConnection,
}

impl AcademicActivityRepository {
    /// Creates a new academic activity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Activities matching `filter`, latest start first.
    pub async fn list(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<AcademicActivity>, RepositoryError> {
        let models = academic_activities::Entity::find()
            .order_by_desc(academic_activities::Column::StartDate)
            .order_by_desc(academic_activities::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let activities = models
            .into_iter()
            .map(into_activity)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(filter.apply(activities))
    }

    /// Gets an activity by ID.
    pub async fn get(&self, id: AcademicActivityId) -> Result<AcademicActivity, RepositoryError> {
        into_activity(load_activity(&self.db, id).await?).map_err(Into::into)
    }

    /// Records a new activity.
    pub async fn create(
        &self,
        input: AcademicActivityInput,
    ) -> Result<AcademicActivity, RepositoryError> {
        let input = input.normalize()?;
        let now = Utc::now();
        let model = academic_activities::ActiveModel {
            id: Set(AcademicActivityId::new().into_inner()),
            name: Set(input.name),
            activity_type: Set(input.activity_type.as_str().to_string()),
            status: Set(input.status.as_str().to_string()),
            organizer: Set(input.organizer),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            location: Set(input.location),
            participants: Set(input.participants),
            description: Set(input.description),
            attachment_key: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(into_activity(model)?)
    }

    /// Replaces an activity's fields. The attachment stays.
    pub async fn update(
        &self,
        id: AcademicActivityId,
        input: AcademicActivityInput,
    ) -> Result<AcademicActivity, RepositoryError> {
        let input = input.normalize()?;
        let model = load_activity(&self.db, id).await?;

        let mut active: academic_activities::ActiveModel = model.into();
        active.name = Set(input.name);
        active.activity_type = Set(input.activity_type.as_str().to_string());
        active.status = Set(input.status.as_str().to_string());
        active.organizer = Set(input.organizer);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.location = Set(input.location);
        active.participants = Set(input.participants);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now());
        Ok(into_activity(active.update(&self.db).await?)?)
    }

    /// Deletes an activity, returning its attachment key.
    pub async fn delete(&self, id: AcademicActivityId) -> Result<Option<String>, RepositoryError> {
        let model = load_activity(&self.db, id).await?;
        let key = model.attachment_key.clone();
        academic_activities::Entity::delete_by_id(model.id).exec(&self.db).await?;
        tracing::info!(activity_id = %id, "academic activity deleted");
        Ok(key)
    }

    /// Records or clears the attachment key.
    pub async fn set_attachment(
        &self,
        id: AcademicActivityId,
        key: Option<String>,
    ) -> Result<(), RepositoryError> {
        let model = load_activity(&self.db, id).await?;
        let mut active: academic_activities::ActiveModel = model.into();
        active.attachment_key = Set(key);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }
}

async fn load_activity<C: ConnectionTrait>(
    conn: &C,
    id: AcademicActivityId,
) -> Result<academic_activities::Model, RepositoryError> {
    academic_activities::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("academic activity", id.into_inner()))
}

fn into_activity(model: academic_activities::Model) -> Result<AcademicActivity, DbErr> {
    Ok(AcademicActivity {
        id: AcademicActivityId::from_uuid(model.id),
        name: model.name,
        activity_type: decode("activity_type", &model.activity_type, ActivityType::parse)?,
        status: decode("status", &model.status, ActivityStatus::parse)?,
        organizer: model.organizer,
        start_date: model.start_date,
        end_date: model.end_date,
        location: model.location,
        participants: model.participants,
        description: model.description,
        attachment_key: model.attachment_key,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
