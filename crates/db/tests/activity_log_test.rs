//! Integration tests for the activity log.

mod common;

use common::{OPERATOR, annual_budget, create_project, date, expense, funded_project, setup};
use fundtrack_core::audit::{ActionKind, ActivityFilter, EntityKind};
use fundtrack_core::budget::BudgetCategory;
use fundtrack_db::{ActivityLogRepository, ExpenseRepository};
use fundtrack_shared::types::{Money, PageRequest};

#[tokio::test]
async fn test_mutations_are_logged_newest_first() {
    let db = setup().await;
    let project = funded_project(&db, "Audited").await;
    let budget = annual_budget(&db, &project, 2024, &[(BudgetCategory::Fuel, 2_000)]).await;
    ExpenseRepository::new(db.clone())
        .create(
            budget.id,
            expense(BudgetCategory::Fuel, "Generator diesel", 450, date(2024, 6, 6)),
            OPERATOR,
        )
        .await
        .unwrap();
    create_project(&db, "Unrelated").await;

    let repo = ActivityLogRepository::new(db.clone());
    let filter = ActivityFilter {
        project_id: Some(project.id),
        ..Default::default()
    };
    let page = repo.list(&filter, &PageRequest::default()).await.unwrap();
    // project create, total budget update, annual create, expense create
    assert_eq!(page.meta.total, 4);

    let newest = &page.data[0].entry;
    assert_eq!(newest.entity, EntityKind::Expense);
    assert_eq!(newest.action, ActionKind::Create);
    assert_eq!(newest.operator, OPERATOR);
    assert_eq!(newest.category, Some(BudgetCategory::Fuel));
    assert_eq!(newest.amount, Some(Money::from_fen(45_000)));
    assert!(newest.new_data.is_some());
}

#[tokio::test]
async fn test_filter_and_paginate() {
    let db = setup().await;
    for name in ["A", "B", "C"] {
        create_project(&db, name).await;
    }
    let repo = ActivityLogRepository::new(db.clone());
    let filter = ActivityFilter {
        entity: Some(EntityKind::Project),
        action: Some(ActionKind::Create),
        ..Default::default()
    };

    let first = repo
        .list(&filter, &PageRequest { page: 1, per_page: 2 })
        .await
        .unwrap();
    assert_eq!(first.meta.total, 3);
    assert_eq!(first.meta.total_pages, 2);
    assert_eq!(first.data.len(), 2);

    let second = repo
        .list(&filter, &PageRequest { page: 2, per_page: 2 })
        .await
        .unwrap();
    assert_eq!(second.data.len(), 1);
    assert_eq!(second.data[0].entry.description, "created project 'A'");

    let deletes = ActivityFilter {
        action: Some(ActionKind::Delete),
        ..Default::default()
    };
    assert_eq!(repo.list(&deletes, &PageRequest::default()).await.unwrap().meta.total, 0);
}

#[tokio::test]
async fn test_voucher_changes_are_logged() {
    let db = setup().await;
    let project = funded_project(&db, "Vouchers").await;
    let budget = annual_budget(&db, &project, 2024, &[(BudgetCategory::Material, 5_000)]).await;
    let expenses = ExpenseRepository::new(db.clone());
    let spent = expenses
        .create(
            budget.id,
            expense(BudgetCategory::Material, "Buffer salts", 320, date(2024, 5, 5)),
            OPERATOR,
        )
        .await
        .unwrap();

    expenses
        .set_voucher(spent.id, Some("vouchers/salts.pdf".to_string()), "auditor")
        .await
        .unwrap();
    expenses.set_voucher(spent.id, None, "auditor").await.unwrap();

    let repo = ActivityLogRepository::new(db.clone());
    let filter = ActivityFilter {
        project_id: Some(project.id),
        entity: Some(EntityKind::Expense),
        action: Some(ActionKind::Update),
        ..Default::default()
    };
    let page = repo.list(&filter, &PageRequest::default()).await.unwrap();
    assert_eq!(page.meta.total, 2);

    let removed = &page.data[0].entry;
    assert_eq!(removed.operator, "auditor");
    assert_eq!(removed.expense_id, Some(spent.id));
    assert_eq!(removed.description, "removed voucher from expense 'Buffer salts'");
    assert_eq!(
        removed.old_data.as_ref().map(|v| v["voucher_key"].clone()),
        Some(serde_json::json!("vouchers/salts.pdf"))
    );
    assert_eq!(
        removed.new_data.as_ref().map(|v| v["voucher_key"].clone()),
        Some(serde_json::Value::Null)
    );

    let attached = &page.data[1].entry;
    assert_eq!(attached.description, "attached voucher to expense 'Buffer salts'");
}
