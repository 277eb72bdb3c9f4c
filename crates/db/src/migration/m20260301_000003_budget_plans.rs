//! Budget preparation plans.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(PLANS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS budget_plan_items;
             DROP TABLE IF EXISTS budget_plans;",
        )
        .await?;
        Ok(())
    }
}

const PLANS_SQL: &str = r"
CREATE TABLE budget_plans (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    remarks TEXT,
    total_amount_fen INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE budget_plan_items (
    id BLOB PRIMARY KEY NOT NULL,
    plan_id BLOB NOT NULL REFERENCES budget_plans(id) ON DELETE CASCADE,
    parent_id BLOB REFERENCES budget_plan_items(id) ON DELETE CASCADE,
    position INTEGER NOT NULL DEFAULT 0,
    category TEXT,
    subcategory TEXT,
    name TEXT NOT NULL,
    specification TEXT,
    unit_price_fen INTEGER NOT NULL DEFAULT 0,
    quantity INTEGER NOT NULL DEFAULT 0,
    amount_fen INTEGER NOT NULL DEFAULT 0,
    remarks TEXT
);

CREATE INDEX idx_budget_plan_items_plan ON budget_plan_items(plan_id, parent_id, position);
";
