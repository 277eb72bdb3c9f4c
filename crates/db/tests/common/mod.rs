//! Fixtures shared by the repository tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use fundtrack_core::budget::{
    AllocationInput, AnnualBudgetInput, Budget, BudgetCategory, CategoryAmounts,
};
use fundtrack_core::expense::ExpenseInput;
use fundtrack_core::project::{Project, ProjectInput};
use fundtrack_db::{BudgetRepository, ProjectRepository};
use fundtrack_shared::types::Money;
use sea_orm::DatabaseConnection;

pub const OPERATOR: &str = "tester";

/// Fresh in-memory database with the schema applied.
pub async fn setup() -> DatabaseConnection {
    fundtrack_db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Allocation from `(category, yuan)` pairs.
pub fn allocation(lines: &[(BudgetCategory, i64)]) -> CategoryAmounts {
    let mut amounts = CategoryAmounts::zeroed();
    for (category, yuan) in lines {
        amounts.set(*category, Money::from_fen(yuan * 100));
    }
    amounts
}

pub async fn create_project(db: &DatabaseConnection, name: &str) -> Project {
    ProjectRepository::new(db.clone())
        .create(
            ProjectInput {
                name: name.to_string(),
                project_code: Some(format!("{name}-code")),
                leader: Some("Dr. Lin".to_string()),
                start_date: Some(date(2024, 1, 1)),
                end_date: Some(date(2026, 12, 31)),
                ..Default::default()
            },
            OPERATOR,
        )
        .await
        .expect("Failed to create project")
}

/// Project whose total budget holds 100 000 yuan of equipment and
/// 50 000 yuan of material.
pub async fn funded_project(db: &DatabaseConnection, name: &str) -> Project {
    let project = create_project(db, name).await;
    BudgetRepository::new(db.clone())
        .update_total(
            project.id,
            &AllocationInput {
                allocation: allocation(&[
                    (BudgetCategory::Equipment, 100_000),
                    (BudgetCategory::Material, 50_000),
                ]),
            },
            OPERATOR,
        )
        .await
        .expect("Failed to fund project");
    ProjectRepository::new(db.clone())
        .get(project.id)
        .await
        .expect("Failed to reload project")
}

pub async fn annual_budget(
    db: &DatabaseConnection,
    project: &Project,
    year: i32,
    lines: &[(BudgetCategory, i64)],
) -> Budget {
    BudgetRepository::new(db.clone())
        .create_annual(
            project.id,
            &AnnualBudgetInput {
                year,
                allocation: allocation(lines),
            },
            OPERATOR,
        )
        .await
        .expect("Failed to create annual budget")
}

pub fn expense(category: BudgetCategory, content: &str, yuan: i64, on: NaiveDate) -> ExpenseInput {
    ExpenseInput {
        category,
        content: content.to_string(),
        specification: None,
        supplier: None,
        amount: Money::from_fen(yuan * 100),
        expense_date: on,
        remarks: None,
    }
}
