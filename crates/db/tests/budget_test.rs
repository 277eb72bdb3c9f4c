//! Integration tests for total and annual budgets.

mod common;

use common::{
    OPERATOR, allocation, annual_budget, create_project, date, expense, funded_project, setup,
};
use fundtrack_core::budget::{AllocationInput, AnnualBudgetInput, BudgetCategory, BudgetError};
use fundtrack_db::{BudgetRepository, ExpenseRepository, ProjectRepository, RepositoryError};
use fundtrack_shared::types::Money;
use rust_decimal_macros::dec;

fn yuan(amount: i64) -> Money {
    Money::from_fen(amount * 100)
}

#[tokio::test]
async fn test_update_total_syncs_project() {
    let db = setup().await;
    let project = funded_project(&db, "Coral").await;

    let refreshed = ProjectRepository::new(db.clone()).get(project.id).await.unwrap();
    assert_eq!(refreshed.total_budget, yuan(150_000));
}

#[tokio::test]
async fn test_annual_requires_funded_total() {
    let db = setup().await;
    let project = create_project(&db, "Unfunded").await;

    let result = BudgetRepository::new(db.clone())
        .create_annual(
            project.id,
            &AnnualBudgetInput {
                year: 2024,
                allocation: allocation(&[(BudgetCategory::Fuel, 10)]),
            },
            OPERATOR,
        )
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::Budget(BudgetError::TotalBudgetNotSet))
    ));
}

#[tokio::test]
async fn test_annual_must_fit_remaining_balance() {
    let db = setup().await;
    let project = funded_project(&db, "Balance").await;
    annual_budget(&db, &project, 2024, &[(BudgetCategory::Equipment, 100_000)]).await;

    let repo = BudgetRepository::new(db.clone());
    let result = repo
        .create_annual(
            project.id,
            &AnnualBudgetInput {
                year: 2025,
                allocation: allocation(&[(BudgetCategory::Material, 60_000)]),
            },
            OPERATOR,
        )
        .await;
    match result {
        Err(RepositoryError::Budget(BudgetError::ExceedsRemaining { requested, remaining })) => {
            assert_eq!(requested, yuan(60_000));
            assert_eq!(remaining, yuan(50_000));
        }
        other => panic!("expected ExceedsRemaining, got {other:?}"),
    }

    let duplicate = repo
        .create_annual(
            project.id,
            &AnnualBudgetInput {
                year: 2024,
                allocation: allocation(&[(BudgetCategory::Material, 1)]),
            },
            OPERATOR,
        )
        .await;
    assert!(matches!(
        duplicate,
        Err(RepositoryError::Budget(BudgetError::DuplicateYear(2024)))
    ));
}

#[tokio::test]
async fn test_total_cannot_drop_below_annual_sum() {
    let db = setup().await;
    let project = funded_project(&db, "Shrink").await;
    annual_budget(&db, &project, 2024, &[(BudgetCategory::Equipment, 80_000)]).await;

    let result = BudgetRepository::new(db.clone())
        .update_total(
            project.id,
            &AllocationInput {
                allocation: allocation(&[(BudgetCategory::Equipment, 70_000)]),
            },
            OPERATOR,
        )
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::Budget(BudgetError::BelowAnnualSum { .. }))
    ));
}

#[tokio::test]
async fn test_annual_update_respects_spend() {
    let db = setup().await;
    let project = funded_project(&db, "Spend").await;
    let budget = annual_budget(
        &db,
        &project,
        2024,
        &[(BudgetCategory::Equipment, 40_000), (BudgetCategory::Material, 10_000)],
    )
    .await;
    ExpenseRepository::new(db.clone())
        .create(
            budget.id,
            expense(BudgetCategory::Material, "Glassware", 8_000, date(2024, 2, 1)),
            OPERATOR,
        )
        .await
        .unwrap();

    let repo = BudgetRepository::new(db.clone());
    let result = repo
        .update_annual(
            budget.id,
            &AllocationInput {
                allocation: allocation(&[
                    (BudgetCategory::Equipment, 40_000),
                    (BudgetCategory::Material, 5_000),
                ]),
            },
            OPERATOR,
        )
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::Budget(BudgetError::CategoryBelowSpent {
            category: BudgetCategory::Material,
            ..
        }))
    ));

    let updated = repo
        .update_annual(
            budget.id,
            &AllocationInput {
                allocation: allocation(&[
                    (BudgetCategory::Equipment, 20_000),
                    (BudgetCategory::Material, 8_000),
                ]),
            },
            OPERATOR,
        )
        .await
        .unwrap();
    assert_eq!(updated.total_amount, yuan(28_000));
    assert_eq!(updated.allocation.get(BudgetCategory::Material), yuan(8_000));
}

#[tokio::test]
async fn test_usage_and_overview() {
    let db = setup().await;
    let project = funded_project(&db, "Overview").await;
    let y2024 = annual_budget(&db, &project, 2024, &[(BudgetCategory::Equipment, 50_000)]).await;
    let y2025 = annual_budget(&db, &project, 2025, &[(BudgetCategory::Material, 25_000)]).await;
    let expenses = ExpenseRepository::new(db.clone());
    expenses
        .create(
            y2024.id,
            expense(BudgetCategory::Equipment, "Centrifuge", 10_000, date(2024, 6, 1)),
            OPERATOR,
        )
        .await
        .unwrap();
    expenses
        .create(
            y2025.id,
            expense(BudgetCategory::Material, "Sensors", 5_000, date(2025, 6, 1)),
            OPERATOR,
        )
        .await
        .unwrap();

    let repo = BudgetRepository::new(db.clone());
    let usage = repo.get_usage(y2024.id).await.unwrap();
    assert_eq!(usage.budget_id, Some(y2024.id));
    assert_eq!(usage.spent, yuan(10_000));
    assert_eq!(usage.remaining, yuan(40_000));
    assert_eq!(usage.execution_rate, dec!(20));

    let overview = repo.overview(project.id).await.unwrap();
    assert_eq!(overview.total.allocated, yuan(150_000));
    assert_eq!(overview.total.spent, yuan(15_000));
    assert_eq!(overview.allocated_to_years, yuan(75_000));
    assert_eq!(overview.unallocated, yuan(75_000));
    assert_eq!(overview.annual.len(), 2);
    assert_eq!(overview.annual[0].year, Some(2024));
    assert_eq!(overview.annual[0].budget_id, Some(y2024.id));
    assert_eq!(overview.annual[1].budget_id, Some(y2025.id));
}

#[tokio::test]
async fn test_delete_annual_removes_its_expenses() {
    let db = setup().await;
    let project = funded_project(&db, "Delete annual").await;
    let budget = annual_budget(&db, &project, 2024, &[(BudgetCategory::Labor, 9_000)]).await;
    let expenses = ExpenseRepository::new(db.clone());
    let spent = expenses
        .create(
            budget.id,
            expense(BudgetCategory::Labor, "Field assistants", 3_000, date(2024, 7, 1)),
            OPERATOR,
        )
        .await
        .unwrap();
    expenses
        .set_voucher(spent.id, Some("vouchers/labor.pdf".to_string()), OPERATOR)
        .await
        .unwrap();

    let repo = BudgetRepository::new(db.clone());
    let keys = repo.delete_budget(budget.id, OPERATOR).await.unwrap();
    assert_eq!(keys, vec!["vouchers/labor.pdf".to_string()]);
    assert!(expenses.get(spent.id).await.is_err());

    let remaining = repo.list_for_project(project.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].year, None);
}

#[tokio::test]
async fn test_delete_total_clears_project_budgets() {
    let db = setup().await;
    let project = funded_project(&db, "Delete total").await;
    annual_budget(&db, &project, 2024, &[(BudgetCategory::Labor, 9_000)]).await;

    let repo = BudgetRepository::new(db.clone());
    let total = repo.list_for_project(project.id).await.unwrap().remove(0);
    repo.delete_budget(total.id, OPERATOR).await.unwrap();

    assert!(repo.list_for_project(project.id).await.unwrap().is_empty());
    let refreshed = ProjectRepository::new(db.clone()).get(project.id).await.unwrap();
    assert!(refreshed.total_budget.is_zero());

    let recreated = repo.ensure_total_budget(project.id, OPERATOR).await.unwrap();
    assert_eq!(recreated.year, None);
    assert!(recreated.total_amount.is_zero());
}
