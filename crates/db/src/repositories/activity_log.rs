//! Activity log persistence.
//!
//! Mutating repositories call [`ActivityLogRepository::record`] with the same
//! transaction they change data in, so an entry exists exactly when its
//! change was committed.

use chrono::Utc;
use fundtrack_core::audit::{ActionKind, ActivityEntry, ActivityFilter, ActivityRecord, EntityKind};
use fundtrack_core::budget::BudgetCategory;
use fundtrack_shared::types::{
    ActivityLogId, BudgetId, ExpenseId, Money, PageRequest, PageResponse, ProjectId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::codec::{decode, from_json, to_json};
use crate::entities::activity_logs;
use crate::error::RepositoryError;

/// Activity log repository.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    db: DatabaseConnection,
}

impl ActivityLogRepository {
    /// Creates a new activity log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Writes one entry on `conn`, usually an open transaction.
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        entry: &ActivityEntry,
    ) -> Result<ActivityLogId, DbErr> {
        let id = ActivityLogId::new();
        activity_logs::ActiveModel {
            id: Set(id.into_inner()),
            project_id: Set(entry.project_id.map(ProjectId::into_inner)),
            budget_id: Set(entry.budget_id.map(BudgetId::into_inner)),
            expense_id: Set(entry.expense_id.map(ExpenseId::into_inner)),
            entity: Set(entry.entity.as_str().to_string()),
            action: Set(entry.action.as_str().to_string()),
            description: Set(entry.description.clone()),
            operator: Set(entry.operator.clone()),
            old_data: Set(entry.old_data.as_ref().map(to_json).transpose()?),
            new_data: Set(entry.new_data.as_ref().map(to_json).transpose()?),
            category: Set(entry.category.map(|c| c.as_str().to_string())),
            amount_fen: Set(entry.amount.map(Money::fen)),
            related_info: Set(entry.related_info.clone()),
            created_at: Set(Utc::now()),
        }
        .insert(conn)
        .await?;

        tracing::debug!(
            entity = %entry.entity,
            action = %entry.action,
            operator = %entry.operator,
            "activity recorded"
        );
        Ok(id)
    }

    /// Lists entries, newest first.
    pub async fn list(
        &self,
        filter: &ActivityFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<ActivityRecord>, RepositoryError> {
        let total = filtered(filter).count(&self.db).await?;
        let rows = filtered(filter)
            .order_by_desc(activity_logs::Column::CreatedAt)
            .order_by_desc(activity_logs::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let data = rows
            .into_iter()
            .map(into_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }
}

fn filtered(filter: &ActivityFilter) -> Select<activity_logs::Entity> {
    let mut query = activity_logs::Entity::find();
    if let Some(project_id) = filter.project_id {
        query = query.filter(activity_logs::Column::ProjectId.eq(project_id.into_inner()));
    }
    if let Some(entity) = filter.entity {
        query = query.filter(activity_logs::Column::Entity.eq(entity.as_str()));
    }
    if let Some(action) = filter.action {
        query = query.filter(activity_logs::Column::Action.eq(action.as_str()));
    }
    query
}

fn into_record(model: activity_logs::Model) -> Result<ActivityRecord, DbErr> {
    let entry = ActivityEntry {
        project_id: model.project_id.map(ProjectId::from_uuid),
        budget_id: model.budget_id.map(BudgetId::from_uuid),
        expense_id: model.expense_id.map(ExpenseId::from_uuid),
        entity: decode("entity", &model.entity, EntityKind::parse)?,
        action: decode("action", &model.action, ActionKind::parse)?,
        description: model.description,
        operator: model.operator,
        old_data: model.old_data.as_deref().map(from_json).transpose()?,
        new_data: model.new_data.as_deref().map(from_json).transpose()?,
        category: model
            .category
            .as_deref()
            .map(|c| decode("category", c, BudgetCategory::parse))
            .transpose()?,
        amount: model.amount_fen.map(Money::from_fen),
        related_info: model.related_info,
    };
    Ok(ActivityRecord {
        id: ActivityLogId::from_uuid(model.id),
        timestamp: model.created_at,
        entry,
    })
}
