//! Expense repository.
//!
//! Expenses are booked against annual budgets only. Listing the total
//! budget returns every expense of its project.

use chrono::Utc;
use fundtrack_core::audit::{ActionKind, ActivityEntry, EntityKind};
use fundtrack_core::budget::BudgetCategory;
use fundtrack_core::expense::{
    Expense, ExpenseError, ExpenseFilter, ExpenseInput, ExpenseService, ExpenseStats,
};
use fundtrack_shared::types::{BudgetId, ExpenseId, Money, ProjectId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::activity_log::ActivityLogRepository;
use super::budget::load_budget;
use crate::codec::decode;
use crate::entities::{budgets, expenses};
use crate::error::RepositoryError;

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets an expense by ID.
    pub async fn get(&self, id: ExpenseId) -> Result<Expense, RepositoryError> {
        into_expense(load_expense(&self.db, id).await?).map_err(Into::into)
    }

    /// Books an expense against an annual budget.
    pub async fn create(
        &self,
        budget_id: BudgetId,
        input: ExpenseInput,
        operator: &str,
    ) -> Result<Expense, RepositoryError> {
        let input = ExpenseService::normalize(input)?;

        let txn = self.db.begin().await?;
        let budget = annual_budget(&txn, budget_id).await?;
        let expense = insert_expense(&txn, &budget, &input).await?;

        let entry = ActivityEntry::new(
            EntityKind::Expense,
            ActionKind::Create,
            format!("recorded expense '{}'", expense.content),
        )
        .project(expense.project_id)
        .budget(budget_id)
        .expense(expense.id)
        .by(operator)
        .after(&expense)
        .category(expense.category)
        .amount(expense.amount);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(expense)
    }

    /// Replaces an expense's fields. Budget usage follows automatically.
    pub async fn update(
        &self,
        id: ExpenseId,
        input: ExpenseInput,
        operator: &str,
    ) -> Result<Expense, RepositoryError> {
        let input = ExpenseService::normalize(input)?;

        let txn = self.db.begin().await?;
        let model = load_expense(&txn, id).await?;
        let before = into_expense(model.clone())?;

        let mut active: expenses::ActiveModel = model.into();
        active.category = Set(input.category.as_str().to_string());
        active.content = Set(input.content);
        active.specification = Set(input.specification);
        active.supplier = Set(input.supplier);
        active.amount_fen = Set(input.amount.fen());
        active.expense_date = Set(input.expense_date);
        active.remarks = Set(input.remarks);
        active.updated_at = Set(Utc::now());
        let after = into_expense(active.update(&txn).await?)?;

        let mut entry = ActivityEntry::new(
            EntityKind::Expense,
            ActionKind::Update,
            format!("updated expense '{}'", after.content),
        )
        .project(after.project_id)
        .budget(after.budget_id)
        .expense(id)
        .by(operator)
        .before(&before)
        .after(&after)
        .category(after.category)
        .amount(after.amount);
        if before.category != after.category {
            entry = entry.related(format!(
                "category {} -> {}",
                before.category.label(),
                after.category.label()
            ));
        }
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(after)
    }

    /// Deletes several expenses at once, returning their voucher keys.
    ///
    /// Nothing is deleted if any ID is unknown.
    pub async fn delete_many(
        &self,
        ids: &[ExpenseId],
        operator: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        let txn = self.db.begin().await?;
        let mut keys = Vec::new();
        for id in ids {
            let model = load_expense(&txn, *id).await?;
            let before = into_expense(model.clone())?;
            keys.extend(model.voucher_key.clone());
            expenses::Entity::delete_by_id(model.id).exec(&txn).await?;

            let entry = ActivityEntry::new(
                EntityKind::Expense,
                ActionKind::Delete,
                format!("deleted expense '{}'", before.content),
            )
            .project(before.project_id)
            .budget(before.budget_id)
            .expense(before.id)
            .by(operator)
            .before(&before)
            .category(before.category)
            .amount(before.amount);
            ActivityLogRepository::record(&txn, &entry).await?;
        }
        txn.commit().await?;

        tracing::info!(count = ids.len(), "expenses deleted");
        Ok(keys)
    }

    /// Expenses of a budget that match `filter`, ordered by date.
    pub async fn list(
        &self,
        budget_id: BudgetId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let budget = load_budget(&self.db, budget_id).await?;
        let query = if budget.year.is_some() {
            expenses::Entity::find().filter(expenses::Column::BudgetId.eq(budget.id))
        } else {
            expenses::Entity::find().filter(expenses::Column::ProjectId.eq(budget.project_id))
        };
        let models = query
            .order_by_asc(expenses::Column::ExpenseDate)
            .order_by_asc(expenses::Column::CreatedAt)
            .order_by_asc(expenses::Column::Id)
            .all(&self.db)
            .await?;

        let expenses = models
            .into_iter()
            .map(into_expense)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(filter.apply(expenses))
    }

    /// Every expense of a project, ordered by date.
    pub async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_asc(expenses::Column::ExpenseDate)
            .order_by_asc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await?;
        models
            .into_iter()
            .map(|m| into_expense(m).map_err(Into::into))
            .collect()
    }

    /// Count and totals of the matching expenses of a budget.
    pub async fn stats(
        &self,
        budget_id: BudgetId,
        filter: &ExpenseFilter,
    ) -> Result<ExpenseStats, RepositoryError> {
        let expenses = self.list(budget_id, filter).await?;
        Ok(ExpenseService::stats(&expenses))
    }

    /// Inserts a batch of expenses in one transaction: all or nothing.
    pub async fn import_batch(
        &self,
        budget_id: BudgetId,
        inputs: Vec<ExpenseInput>,
        operator: &str,
    ) -> Result<Vec<Expense>, RepositoryError> {
        if inputs.is_empty() {
            return Err(ExpenseError::EmptyImport.into());
        }
        let inputs = inputs
            .into_iter()
            .map(ExpenseService::normalize)
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self.db.begin().await?;
        let budget = annual_budget(&txn, budget_id).await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in &inputs {
            created.push(insert_expense(&txn, &budget, input).await?);
        }

        let total: Money = created.iter().map(|e| e.amount).sum();
        let entry = ActivityEntry::new(
            EntityKind::Expense,
            ActionKind::Import,
            format!("imported {} expenses", created.len()),
        )
        .project(ProjectId::from_uuid(budget.project_id))
        .budget(budget_id)
        .by(operator)
        .amount(total)
        .related(format!("{} rows", created.len()));
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        tracing::info!(budget_id = %budget_id, count = created.len(), "expenses imported");
        Ok(created)
    }

    /// Records or clears the voucher key of an expense.
    pub async fn set_voucher(
        &self,
        id: ExpenseId,
        key: Option<String>,
        operator: &str,
    ) -> Result<Expense, RepositoryError> {
        let txn = self.db.begin().await?;
        let model = load_expense(&txn, id).await?;
        let before = into_expense(model.clone())?;

        let mut active: expenses::ActiveModel = model.into();
        active.voucher_key = Set(key);
        active.updated_at = Set(Utc::now());
        let after = into_expense(active.update(&txn).await?)?;

        let description = if after.voucher_key.is_some() {
            format!("attached voucher to expense '{}'", after.content)
        } else {
            format!("removed voucher from expense '{}'", after.content)
        };
        let entry = ActivityEntry::new(EntityKind::Expense, ActionKind::Update, description)
            .project(after.project_id)
            .budget(after.budget_id)
            .expense(id)
            .by(operator)
            .before(&before)
            .after(&after)
            .category(after.category);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(after)
    }
}

async fn load_expense<C: ConnectionTrait>(
    conn: &C,
    id: ExpenseId,
) -> Result<expenses::Model, RepositoryError> {
    expenses::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("expense", id.into_inner()))
}

async fn annual_budget<C: ConnectionTrait>(
    conn: &C,
    id: BudgetId,
) -> Result<budgets::Model, RepositoryError> {
    let budget = load_budget(conn, id).await?;
    if budget.year.is_none() {
        return Err(ExpenseError::TotalBudgetTarget.into());
    }
    Ok(budget)
}

/// Inserts a validated expense under `budget`.
pub(crate) async fn insert_expense<C: ConnectionTrait>(
    conn: &C,
    budget: &budgets::Model,
    input: &ExpenseInput,
) -> Result<Expense, DbErr> {
    let now = Utc::now();
    let model = expenses::ActiveModel {
        id: Set(ExpenseId::new().into_inner()),
        project_id: Set(budget.project_id),
        budget_id: Set(budget.id),
        category: Set(input.category.as_str().to_string()),
        content: Set(input.content.clone()),
        specification: Set(input.specification.clone()),
        supplier: Set(input.supplier.clone()),
        amount_fen: Set(input.amount.fen()),
        expense_date: Set(input.expense_date),
        remarks: Set(input.remarks.clone()),
        voucher_key: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;
    into_expense(model)
}

pub(crate) fn into_expense(model: expenses::Model) -> Result<Expense, DbErr> {
    Ok(Expense {
        id: ExpenseId::from_uuid(model.id),
        project_id: ProjectId::from_uuid(model.project_id),
        budget_id: BudgetId::from_uuid(model.budget_id),
        category: decode("category", &model.category, BudgetCategory::parse)?,
        content: model.content,
        specification: model.specification,
        supplier: model.supplier,
        amount: Money::from_fen(model.amount_fen),
        expense_date: model.expense_date,
        remarks: model.remarks,
        voucher_key: model.voucher_key,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
