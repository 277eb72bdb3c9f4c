//! Project repository.

use std::collections::HashMap;

use chrono::Utc;
use fundtrack_core::audit::{ActionKind, ActivityEntry, EntityKind};
use fundtrack_core::budget::CategoryAmounts;
use fundtrack_core::project::{Project, ProjectInput, ProjectService, ProjectSummary};
use fundtrack_shared::types::{BudgetId, Money, ProjectId, execution_rate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::activity_log::ActivityLogRepository;
use super::budget::insert_budget;
use crate::entities::{budgets, expenses, project_documents, project_outcomes, projects};
use crate::error::RepositoryError;

/// Project repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a project together with an empty total budget.
    pub async fn create(
        &self,
        input: ProjectInput,
        operator: &str,
    ) -> Result<Project, RepositoryError> {
        let input = ProjectService::normalize(input)?;

        let txn = self.db.begin().await?;
        let project = insert_project(&txn, &input, Money::ZERO).await?;
        let total = insert_budget(&txn, project.id, None, &CategoryAmounts::zeroed()).await?;

        let entry = ActivityEntry::new(
            EntityKind::Project,
            ActionKind::Create,
            format!("created project '{}'", project.name),
        )
        .project(project.id)
        .budget(BudgetId::from_uuid(total.id))
        .by(operator)
        .after(&project);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        tracing::info!(project_id = %project.id, name = %project.name, "project created");
        Ok(project)
    }

    /// Gets a project by ID.
    pub async fn get(&self, id: ProjectId) -> Result<Project, RepositoryError> {
        Ok(into_project(load_project(&self.db, id).await?))
    }

    /// Finds a project by its project code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Project>, RepositoryError> {
        let model = projects::Entity::find()
            .filter(projects::Column::ProjectCode.eq(code))
            .one(&self.db)
            .await?;
        Ok(model.map(into_project))
    }

    /// Lists projects in creation order with the execution of their total
    /// budget.
    pub async fn list(&self) -> Result<Vec<ProjectSummary>, RepositoryError> {
        let models = projects::Entity::find()
            .order_by_asc(projects::Column::CreatedAt)
            .order_by_asc(projects::Column::Id)
            .all(&self.db)
            .await?;

        let totals: Vec<(Uuid, i64)> = budgets::Entity::find()
            .select_only()
            .column(budgets::Column::ProjectId)
            .column(budgets::Column::TotalAmountFen)
            .filter(budgets::Column::Year.is_null())
            .into_tuple()
            .all(&self.db)
            .await?;
        let allocated: HashMap<Uuid, Money> = totals
            .into_iter()
            .map(|(id, fen)| (id, Money::from_fen(fen)))
            .collect();

        let amounts: Vec<(Uuid, i64)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::ProjectId)
            .column(expenses::Column::AmountFen)
            .into_tuple()
            .all(&self.db)
            .await?;
        let mut spent: HashMap<Uuid, Money> = HashMap::new();
        for (id, fen) in amounts {
            *spent.entry(id).or_default() += Money::from_fen(fen);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let budget_allocated = allocated.get(&model.id).copied().unwrap_or_default();
                let budget_spent = spent.get(&model.id).copied().unwrap_or_default();
                ProjectSummary {
                    project: into_project(model),
                    budget_allocated,
                    budget_spent,
                    execution_rate: execution_rate(budget_spent, budget_allocated),
                }
            })
            .collect())
    }

    /// Updates a project's fields.
    ///
    /// The headline total budget is not editable here; it follows the
    /// total budget's allocation.
    pub async fn update(
        &self,
        id: ProjectId,
        input: ProjectInput,
        operator: &str,
    ) -> Result<Project, RepositoryError> {
        let input = ProjectService::normalize(input)?;

        let txn = self.db.begin().await?;
        let model = load_project(&txn, id).await?;
        let before = into_project(model.clone());

        let mut active: projects::ActiveModel = model.into();
        active.name = Set(input.name);
        active.financial_code = Set(input.financial_code);
        active.project_code = Set(input.project_code);
        active.project_type = Set(input.project_type);
        active.leader = Set(input.leader);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.updated_at = Set(Utc::now());
        let after = into_project(active.update(&txn).await?);

        let entry = ActivityEntry::new(
            EntityKind::Project,
            ActionKind::Update,
            format!("updated project '{}'", after.name),
        )
        .project(id)
        .by(operator)
        .before(&before)
        .after(&after);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(after)
    }

    /// Deletes a project and everything it owns.
    ///
    /// Returns the storage keys of the attachments that went with it.
    pub async fn delete(
        &self,
        id: ProjectId,
        operator: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        let txn = self.db.begin().await?;
        let model = load_project(&txn, id).await?;
        let before = into_project(model.clone());

        let mut keys: Vec<Option<String>> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::VoucherKey)
            .filter(expenses::Column::ProjectId.eq(model.id))
            .into_tuple()
            .all(&txn)
            .await?;
        let outcome_keys: Vec<Option<String>> = project_outcomes::Entity::find()
            .select_only()
            .column(project_outcomes::Column::AttachmentKey)
            .filter(project_outcomes::Column::ProjectId.eq(model.id))
            .into_tuple()
            .all(&txn)
            .await?;
        let document_keys: Vec<Option<String>> = project_documents::Entity::find()
            .select_only()
            .column(project_documents::Column::FileKey)
            .filter(project_documents::Column::ProjectId.eq(model.id))
            .into_tuple()
            .all(&txn)
            .await?;
        keys.extend(outcome_keys);
        keys.extend(document_keys);

        model.delete(&txn).await?;

        let entry = ActivityEntry::new(
            EntityKind::Project,
            ActionKind::Delete,
            format!("deleted project '{}'", before.name),
        )
        .project(id)
        .by(operator)
        .before(&before);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        tracing::info!(project_id = %id, "project deleted");
        Ok(keys.into_iter().flatten().collect())
    }
}

pub(crate) async fn load_project<C: ConnectionTrait>(
    conn: &C,
    id: ProjectId,
) -> Result<projects::Model, RepositoryError> {
    projects::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("project", id.into_inner()))
}

/// Inserts a validated project row whose headline figure is `total_budget`.
pub(crate) async fn insert_project<C: ConnectionTrait>(
    conn: &C,
    input: &ProjectInput,
    total_budget: Money,
) -> Result<Project, sea_orm::DbErr> {
    let now = Utc::now();
    let model = projects::ActiveModel {
        id: Set(ProjectId::new().into_inner()),
        name: Set(input.name.clone()),
        financial_code: Set(input.financial_code.clone()),
        project_code: Set(input.project_code.clone()),
        project_type: Set(input.project_type.clone()),
        leader: Set(input.leader.clone()),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        total_budget_fen: Set(total_budget.fen()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;
    Ok(into_project(model))
}

pub(crate) fn into_project(model: projects::Model) -> Project {
    Project {
        id: ProjectId::from_uuid(model.id),
        name: model.name,
        financial_code: model.financial_code,
        project_code: model.project_code,
        project_type: model.project_type,
        leader: model.leader,
        start_date: model.start_date,
        end_date: model.end_date,
        total_budget: Money::from_fen(model.total_budget_fen),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
