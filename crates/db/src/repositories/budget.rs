//! Budget repository: total and annual budgets with their category lines.
//!
//! Spend is never stored. It is summed from the expenses of a budget (or of
//! every annual budget, for the total budget) each time it is needed.

use chrono::Utc;
use fundtrack_core::audit::{ActionKind, ActivityEntry, EntityKind};
use fundtrack_core::budget::{
    AllocationInput, AnnualBudgetInput, AnnualBudgetSnapshot, Budget, BudgetCategory, BudgetError,
    BudgetService, BudgetUsage, CategoryAmounts, ProjectBudgetOverview,
};
use fundtrack_core::expense::ExpenseService;
use fundtrack_shared::types::{BudgetId, BudgetItemId, Money, ProjectId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::activity_log::ActivityLogRepository;
use super::project::load_project;
use crate::codec::decode;
use crate::entities::{budget_items, budgets, expenses, projects};
use crate::error::RepositoryError;

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a budget with its allocation.
    pub async fn get(&self, id: BudgetId) -> Result<Budget, RepositoryError> {
        let model = load_budget(&self.db, id).await?;
        assemble(&self.db, model).await.map_err(Into::into)
    }

    /// Budgets of a project: the total budget first, then by year.
    pub async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Budget>, RepositoryError> {
        load_project(&self.db, project_id).await?;
        let models = budgets::Entity::find()
            .filter(budgets::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_asc(budgets::Column::Year)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(models.len());
        for model in models {
            result.push(assemble(&self.db, model).await?);
        }
        Ok(result)
    }

    /// Returns the project's total budget, creating an empty one if it is
    /// missing.
    pub async fn ensure_total_budget(
        &self,
        project_id: ProjectId,
        operator: &str,
    ) -> Result<Budget, RepositoryError> {
        let txn = self.db.begin().await?;
        load_project(&txn, project_id).await?;
        let model = match find_total(&txn, project_id.into_inner()).await? {
            Some(model) => model,
            None => {
                let model =
                    insert_budget(&txn, project_id, None, &CategoryAmounts::zeroed()).await?;
                let entry = ActivityEntry::new(
                    EntityKind::Budget,
                    ActionKind::Create,
                    "created total budget",
                )
                .project(project_id)
                .budget(BudgetId::from_uuid(model.id))
                .by(operator);
                ActivityLogRepository::record(&txn, &entry).await?;
                model
            }
        };
        let budget = assemble(&txn, model).await?;
        txn.commit().await?;
        Ok(budget)
    }

    /// Replaces the total budget's allocation.
    ///
    /// The new total may not drop below what annual budgets already take.
    /// The project's headline budget follows the new total.
    pub async fn update_total(
        &self,
        project_id: ProjectId,
        input: &AllocationInput,
        operator: &str,
    ) -> Result<Budget, RepositoryError> {
        let new_total = BudgetService::validate_allocation(&input.allocation)?;

        let txn = self.db.begin().await?;
        let project = load_project(&txn, project_id).await?;
        let model = match find_total(&txn, project_id.into_inner()).await? {
            Some(model) => model,
            None => insert_budget(&txn, project_id, None, &CategoryAmounts::zeroed()).await?,
        };
        let before = assemble(&txn, model.clone()).await?;

        let annual = annual_sum(&txn, project_id.into_inner(), None).await?;
        BudgetService::validate_total_update(new_total, annual)?;

        let updated = write_allocation(&txn, model, &input.allocation, new_total).await?;

        let mut project: projects::ActiveModel = project.into();
        project.total_budget_fen = Set(new_total.fen());
        project.updated_at = Set(Utc::now());
        project.update(&txn).await?;

        let after = assemble(&txn, updated).await?;
        let entry = ActivityEntry::new(
            EntityKind::Budget,
            ActionKind::Update,
            "updated total budget",
        )
        .project(project_id)
        .budget(after.id)
        .by(operator)
        .before(&before)
        .after(&after)
        .amount(new_total);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        tracing::info!(project_id = %project_id, total = %new_total.wan(), "total budget updated");
        Ok(after)
    }

    /// Creates an annual budget out of the total budget's remaining balance.
    pub async fn create_annual(
        &self,
        project_id: ProjectId,
        input: &AnnualBudgetInput,
        operator: &str,
    ) -> Result<Budget, RepositoryError> {
        BudgetService::validate_year(input.year)?;
        let requested = BudgetService::validate_allocation(&input.allocation)?;

        let txn = self.db.begin().await?;
        load_project(&txn, project_id).await?;

        let duplicate = budgets::Entity::find()
            .filter(budgets::Column::ProjectId.eq(project_id.into_inner()))
            .filter(budgets::Column::Year.eq(input.year))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(BudgetError::DuplicateYear(input.year).into());
        }

        let total = find_total(&txn, project_id.into_inner())
            .await?
            .map_or(Money::ZERO, |m| Money::from_fen(m.total_amount_fen));
        let annual = annual_sum(&txn, project_id.into_inner(), None).await?;
        BudgetService::validate_new_annual(total, annual, requested)?;

        let model = insert_budget(&txn, project_id, Some(input.year), &input.allocation).await?;
        let budget = assemble(&txn, model).await?;

        let entry = ActivityEntry::new(
            EntityKind::Budget,
            ActionKind::Create,
            format!("created annual budget {}", input.year),
        )
        .project(project_id)
        .budget(budget.id)
        .by(operator)
        .after(&budget)
        .amount(requested);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        tracing::info!(project_id = %project_id, year = input.year, "annual budget created");
        Ok(budget)
    }

    /// Replaces an annual budget's allocation.
    ///
    /// It must fit into the total budget next to the other annual budgets
    /// and may not drop below the spend of any category. Given the total
    /// budget's ID this behaves like [`Self::update_total`].
    pub async fn update_annual(
        &self,
        id: BudgetId,
        input: &AllocationInput,
        operator: &str,
    ) -> Result<Budget, RepositoryError> {
        let model = load_budget(&self.db, id).await?;
        let Some(year) = model.year else {
            return self
                .update_total(ProjectId::from_uuid(model.project_id), input, operator)
                .await;
        };

        let txn = self.db.begin().await?;
        let before = assemble(&txn, model.clone()).await?;
        let total = find_total(&txn, model.project_id)
            .await?
            .map_or(Money::ZERO, |m| Money::from_fen(m.total_amount_fen));
        let others = annual_sum(&txn, model.project_id, Some(model.id)).await?;
        let spent = spent_on(&txn, &model).await?;
        let new_total =
            BudgetService::validate_annual_update(total, others, &input.allocation, &spent)?;

        let updated = write_allocation(&txn, model, &input.allocation, new_total).await?;
        let after = assemble(&txn, updated).await?;

        let entry = ActivityEntry::new(
            EntityKind::Budget,
            ActionKind::Update,
            format!("updated annual budget {year}"),
        )
        .project(after.project_id)
        .budget(after.id)
        .by(operator)
        .before(&before)
        .after(&after)
        .amount(new_total);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(after)
    }

    /// Deletes a budget and its expenses, returning their voucher keys.
    ///
    /// Deleting the total budget deletes every budget of the project.
    pub async fn delete_budget(
        &self,
        id: BudgetId,
        operator: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        let txn = self.db.begin().await?;
        let model = load_budget(&txn, id).await?;
        let before = assemble(&txn, model.clone()).await?;
        let project_id = ProjectId::from_uuid(model.project_id);

        let mut affected = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::VoucherKey);
        let mut removed = budgets::Entity::delete_many();
        let description = if let Some(year) = model.year {
            affected = affected.filter(expenses::Column::BudgetId.eq(model.id));
            removed = removed.filter(budgets::Column::Id.eq(model.id));
            format!("deleted annual budget {year}")
        } else {
            affected = affected.filter(expenses::Column::ProjectId.eq(model.project_id));
            removed = removed.filter(budgets::Column::ProjectId.eq(model.project_id));

            let project = load_project(&txn, project_id).await?;
            let mut project: projects::ActiveModel = project.into();
            project.total_budget_fen = Set(0);
            project.updated_at = Set(Utc::now());
            project.update(&txn).await?;
            "deleted total budget and all annual budgets".to_string()
        };

        let keys: Vec<Option<String>> = affected.into_tuple().all(&txn).await?;
        let result = removed.exec(&txn).await?;

        let entry = ActivityEntry::new(EntityKind::Budget, ActionKind::Delete, description)
            .project(project_id)
            .budget(before.id)
            .by(operator)
            .before(&before)
            .amount(before.total_amount)
            .related(format!("{} budget(s) removed", result.rows_affected));
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        tracing::info!(budget_id = %id, rows = result.rows_affected, "budget deleted");
        Ok(keys.into_iter().flatten().collect())
    }

    /// Allocation and spend of one budget.
    pub async fn get_usage(&self, id: BudgetId) -> Result<BudgetUsage, RepositoryError> {
        let model = load_budget(&self.db, id).await?;
        let allocation = load_allocation(&self.db, model.id).await?;
        let spent = spent_on(&self.db, &model).await?;
        Ok(BudgetService::usage(model.year, &allocation, &spent).with_budget(id))
    }

    /// Usage of the total budget and every annual budget of a project.
    pub async fn overview(
        &self,
        project_id: ProjectId,
    ) -> Result<ProjectBudgetOverview, RepositoryError> {
        load_project(&self.db, project_id).await?;
        let models = budgets::Entity::find()
            .filter(budgets::Column::ProjectId.eq(project_id.into_inner()))
            .all(&self.db)
            .await?;

        let mut total = None;
        let mut snapshots = Vec::new();
        let mut ids = Vec::new();
        for model in models {
            let allocation = load_allocation(&self.db, model.id).await?;
            match model.year {
                None => total = Some((BudgetId::from_uuid(model.id), allocation)),
                Some(year) => {
                    let spent = spent_by_budget(&self.db, model.id).await?;
                    ids.push((year, BudgetId::from_uuid(model.id)));
                    snapshots.push(AnnualBudgetSnapshot {
                        year,
                        allocation,
                        spent,
                    });
                }
            }
        }

        let total_allocation = total.as_ref().map(|(_, a)| a.clone()).unwrap_or_default();
        let mut overview = BudgetService::overview(&total_allocation, &snapshots);
        if let Some((id, _)) = total {
            overview.total.budget_id = Some(id);
        }
        for usage in &mut overview.annual {
            usage.budget_id = ids.iter().find(|(y, _)| Some(*y) == usage.year).map(|(_, id)| *id);
        }
        Ok(overview)
    }
}

pub(crate) async fn load_budget<C: ConnectionTrait>(
    conn: &C,
    id: BudgetId,
) -> Result<budgets::Model, RepositoryError> {
    budgets::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("budget", id.into_inner()))
}

pub(crate) async fn find_total<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<Option<budgets::Model>, DbErr> {
    budgets::Entity::find()
        .filter(budgets::Column::ProjectId.eq(project_id))
        .filter(budgets::Column::Year.is_null())
        .one(conn)
        .await
}

/// Sum of the annual budgets of a project, optionally leaving one out.
pub(crate) async fn annual_sum<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    except: Option<Uuid>,
) -> Result<Money, DbErr> {
    let mut query = budgets::Entity::find()
        .select_only()
        .column(budgets::Column::TotalAmountFen)
        .filter(budgets::Column::ProjectId.eq(project_id))
        .filter(budgets::Column::Year.is_not_null());
    if let Some(id) = except {
        query = query.filter(budgets::Column::Id.ne(id));
    }
    let amounts: Vec<i64> = query.into_tuple().all(conn).await?;
    Ok(amounts.into_iter().map(Money::from_fen).sum())
}

pub(crate) async fn load_allocation<C: ConnectionTrait>(
    conn: &C,
    budget_id: Uuid,
) -> Result<CategoryAmounts, DbErr> {
    let rows: Vec<(String, i64)> = budget_items::Entity::find()
        .select_only()
        .column(budget_items::Column::Category)
        .column(budget_items::Column::AmountFen)
        .filter(budget_items::Column::BudgetId.eq(budget_id))
        .into_tuple()
        .all(conn)
        .await?;
    category_amounts(rows)
}

async fn spent_by_budget<C: ConnectionTrait>(
    conn: &C,
    budget_id: Uuid,
) -> Result<CategoryAmounts, DbErr> {
    let rows: Vec<(String, i64)> = expenses::Entity::find()
        .select_only()
        .column(expenses::Column::Category)
        .column(expenses::Column::AmountFen)
        .filter(expenses::Column::BudgetId.eq(budget_id))
        .into_tuple()
        .all(conn)
        .await?;
    category_amounts(rows)
}

/// Spend of one budget. The total budget sees every expense of its project.
pub(crate) async fn spent_on<C: ConnectionTrait>(
    conn: &C,
    budget: &budgets::Model,
) -> Result<CategoryAmounts, DbErr> {
    if budget.year.is_some() {
        return spent_by_budget(conn, budget.id).await;
    }
    let rows: Vec<(String, i64)> = expenses::Entity::find()
        .select_only()
        .column(expenses::Column::Category)
        .column(expenses::Column::AmountFen)
        .filter(expenses::Column::ProjectId.eq(budget.project_id))
        .into_tuple()
        .all(conn)
        .await?;
    category_amounts(rows)
}

fn category_amounts(rows: Vec<(String, i64)>) -> Result<CategoryAmounts, DbErr> {
    let entries = rows
        .into_iter()
        .map(|(code, fen)| {
            let category = decode("category", &code, BudgetCategory::parse)?;
            Ok((category, Money::from_fen(fen)))
        })
        .collect::<Result<Vec<_>, DbErr>>()?;
    Ok(ExpenseService::spent_by_category(entries))
}

/// Inserts a budget with a line for every category.
pub(crate) async fn insert_budget<C: ConnectionTrait>(
    conn: &C,
    project_id: ProjectId,
    year: Option<i32>,
    allocation: &CategoryAmounts,
) -> Result<budgets::Model, DbErr> {
    let now = Utc::now();
    let model = budgets::ActiveModel {
        id: Set(BudgetId::new().into_inner()),
        project_id: Set(project_id.into_inner()),
        year: Set(year),
        total_amount_fen: Set(allocation.total().fen()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;
    insert_items(conn, model.id, allocation).await?;
    Ok(model)
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    budget_id: Uuid,
    allocation: &CategoryAmounts,
) -> Result<(), DbErr> {
    let items = BudgetCategory::ALL.into_iter().map(|category| budget_items::ActiveModel {
        id: Set(BudgetItemId::new().into_inner()),
        budget_id: Set(budget_id),
        category: Set(category.as_str().to_string()),
        amount_fen: Set(allocation.get(category).fen()),
    });
    budget_items::Entity::insert_many(items).exec(conn).await?;
    Ok(())
}

async fn write_allocation<C: ConnectionTrait>(
    conn: &C,
    model: budgets::Model,
    allocation: &CategoryAmounts,
    total: Money,
) -> Result<budgets::Model, DbErr> {
    budget_items::Entity::delete_many()
        .filter(budget_items::Column::BudgetId.eq(model.id))
        .exec(conn)
        .await?;
    insert_items(conn, model.id, allocation).await?;

    let mut active: budgets::ActiveModel = model.into();
    active.total_amount_fen = Set(total.fen());
    active.updated_at = Set(Utc::now());
    active.update(conn).await
}

pub(crate) async fn assemble<C: ConnectionTrait>(
    conn: &C,
    model: budgets::Model,
) -> Result<Budget, DbErr> {
    let allocation = load_allocation(conn, model.id).await?;
    Ok(Budget {
        id: BudgetId::from_uuid(model.id),
        project_id: ProjectId::from_uuid(model.project_id),
        year: model.year,
        allocation,
        total_amount: Money::from_fen(model.total_amount_fen),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
