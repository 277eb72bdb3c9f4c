//! Integration tests for bundle export and import.

mod common;

use common::{OPERATOR, annual_budget, date, expense, funded_project, setup};
use fundtrack_core::budget::BudgetCategory;
use fundtrack_core::export::ExportError;
use fundtrack_db::{
    BudgetRepository, ExpenseRepository, ExportRepository, ProjectRepository, RepositoryError,
};
use fundtrack_shared::types::{BudgetId, Money};

#[tokio::test]
async fn test_export_then_import_copies_project() {
    let db = setup().await;
    let project = funded_project(&db, "Source").await;
    let budget = annual_budget(&db, &project, 2024, &[(BudgetCategory::Equipment, 40_000)]).await;
    ExpenseRepository::new(db.clone())
        .create(
            budget.id,
            expense(BudgetCategory::Equipment, "Oscilloscope", 12_000, date(2024, 8, 8)),
            OPERATOR,
        )
        .await
        .unwrap();

    let repo = ExportRepository::new(db.clone());
    let bundle = repo.export(project.id).await.unwrap();
    assert_eq!(bundle.budgets.len(), 2);
    assert_eq!(bundle.expenses.len(), 1);
    assert_eq!(
        bundle.total_budget().map(|b| b.allocation.total()),
        Some(Money::from_fen(15_000_000))
    );

    let copy = repo.import(bundle, OPERATOR).await.unwrap();
    assert_ne!(copy.id, project.id);
    assert_eq!(copy.name, "Source");
    assert_eq!(copy.total_budget, Money::from_fen(15_000_000));
    assert_eq!(copy.total_budget, project.total_budget);

    let overview = BudgetRepository::new(db.clone()).overview(copy.id).await.unwrap();
    assert_eq!(overview.total.allocated, Money::from_fen(15_000_000));
    assert_eq!(overview.annual.len(), 1);
    assert_ne!(overview.annual[0].budget_id, Some(budget.id));
    assert_eq!(overview.annual[0].spent, Money::from_fen(1_200_000));

    assert_eq!(ProjectRepository::new(db.clone()).list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_bundle_writes_nothing() {
    let db = setup().await;
    let project = funded_project(&db, "Broken").await;
    let budget = annual_budget(&db, &project, 2024, &[(BudgetCategory::Material, 1_000)]).await;
    ExpenseRepository::new(db.clone())
        .create(
            budget.id,
            expense(BudgetCategory::Material, "Filters", 100, date(2024, 2, 2)),
            OPERATOR,
        )
        .await
        .unwrap();

    let repo = ExportRepository::new(db.clone());
    let mut bundle = repo.export(project.id).await.unwrap();
    let stray = BudgetId::new();
    bundle.expenses[0].budget_id = stray;

    let result = repo.import(bundle, OPERATOR).await;
    assert!(matches!(
        result,
        Err(RepositoryError::Export(ExportError::UnknownBudget(id))) if id == stray
    ));
    assert_eq!(ProjectRepository::new(db.clone()).list().await.unwrap().len(), 1);
}
