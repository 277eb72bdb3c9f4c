//! Project bundle export and import.

use std::collections::HashMap;

use chrono::Utc;
use fundtrack_core::audit::{ActionKind, ActivityEntry, EntityKind};
use fundtrack_core::export::{ExportError, ProjectBundle};
use fundtrack_core::project::Project;
use fundtrack_shared::types::ProjectId;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::activity_log::ActivityLogRepository;
use super::budget::{BudgetRepository, insert_budget};
use super::expense::{ExpenseRepository, insert_expense};
use super::project::{ProjectRepository, insert_project};
use crate::error::RepositoryError;

/// Reads and writes whole-project bundles.
#[derive(Debug, Clone)]
pub struct ExportRepository {
    db: DatabaseConnection,
}

impl ExportRepository {
    /// Creates a new export repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Snapshots a project with its budgets and expenses.
    pub async fn export(&self, project_id: ProjectId) -> Result<ProjectBundle, RepositoryError> {
        let project = ProjectRepository::new(self.db.clone()).get(project_id).await?;
        let budgets = BudgetRepository::new(self.db.clone())
            .list_for_project(project_id)
            .await?;
        let expenses = ExpenseRepository::new(self.db.clone())
            .list_for_project(project_id)
            .await?;
        Ok(ProjectBundle::from_records(&project, &budgets, &expenses, Utc::now()))
    }

    /// Creates a new project from a bundle.
    ///
    /// Every record gets a fresh ID; expenses are re-linked to the new
    /// budgets through the budget IDs inside the bundle. Nothing is written
    /// unless the whole bundle is valid.
    pub async fn import(
        &self,
        bundle: ProjectBundle,
        operator: &str,
    ) -> Result<Project, RepositoryError> {
        let bundle = bundle.validate()?;

        let total = bundle
            .total_budget()
            .map(|b| b.allocation.total())
            .ok_or(ExportError::MissingTotalBudget)?;

        let txn = self.db.begin().await?;
        let project = insert_project(&txn, &bundle.project, total).await?;

        let mut budgets = HashMap::with_capacity(bundle.budgets.len());
        for budget in &bundle.budgets {
            let model = insert_budget(&txn, project.id, budget.year, &budget.allocation).await?;
            budgets.insert(budget.id, model);
        }
        for expense in &bundle.expenses {
            let budget = budgets
                .get(&expense.budget_id)
                .ok_or(ExportError::UnknownBudget(expense.budget_id))?;
            insert_expense(&txn, budget, &expense.expense).await?;
        }

        let entry = ActivityEntry::new(
            EntityKind::Project,
            ActionKind::Import,
            format!("imported project '{}'", project.name),
        )
        .project(project.id)
        .by(operator)
        .after(&project)
        .related(format!(
            "{} budget(s), {} expense(s)",
            bundle.budgets.len(),
            bundle.expenses.len()
        ));
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        tracing::info!(
            project_id = %project.id,
            expenses = bundle.expenses.len(),
            "project imported"
        );
        Ok(project)
    }
}
