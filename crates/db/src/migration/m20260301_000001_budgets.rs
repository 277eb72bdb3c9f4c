//! Projects, budgets, expenses and the activity log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(BUDGETS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS activity_logs;
             DROP TABLE IF EXISTS expenses;
             DROP TABLE IF EXISTS budget_items;
             DROP TABLE IF EXISTS budgets;
             DROP TABLE IF EXISTS projects;",
        )
        .await?;
        Ok(())
    }
}

// Money columns hold fen as INTEGER. Dates are ISO-8601 TEXT.
const BUDGETS_SQL: &str = r"
CREATE TABLE projects (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    financial_code TEXT,
    project_code TEXT,
    project_type TEXT,
    leader TEXT,
    start_date TEXT,
    end_date TEXT,
    total_budget_fen INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_projects_created ON projects(created_at);

-- year IS NULL marks the total budget
CREATE TABLE budgets (
    id BLOB PRIMARY KEY NOT NULL,
    project_id BLOB NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    year INTEGER,
    total_amount_fen INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- One total budget per project
CREATE UNIQUE INDEX ux_budgets_total ON budgets(project_id) WHERE year IS NULL;

-- One annual budget per project and year
CREATE UNIQUE INDEX ux_budgets_year ON budgets(project_id, year) WHERE year IS NOT NULL;

CREATE TABLE budget_items (
    id BLOB PRIMARY KEY NOT NULL,
    budget_id BLOB NOT NULL REFERENCES budgets(id) ON DELETE CASCADE,
    category TEXT NOT NULL,
    amount_fen INTEGER NOT NULL DEFAULT 0 CHECK (amount_fen >= 0),
    UNIQUE (budget_id, category)
);

CREATE TABLE expenses (
    id BLOB PRIMARY KEY NOT NULL,
    project_id BLOB NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    budget_id BLOB NOT NULL REFERENCES budgets(id) ON DELETE CASCADE,
    category TEXT NOT NULL,
    content TEXT NOT NULL,
    specification TEXT,
    supplier TEXT,
    amount_fen INTEGER NOT NULL CHECK (amount_fen > 0),
    expense_date TEXT NOT NULL,
    remarks TEXT,
    voucher_key TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_expenses_budget ON expenses(budget_id, expense_date);
CREATE INDEX idx_expenses_project ON expenses(project_id);

-- No foreign keys: entries outlive the records they describe
CREATE TABLE activity_logs (
    id BLOB PRIMARY KEY NOT NULL,
    project_id BLOB,
    budget_id BLOB,
    expense_id BLOB,
    entity TEXT NOT NULL,
    action TEXT NOT NULL,
    description TEXT NOT NULL,
    operator TEXT NOT NULL,
    old_data TEXT,
    new_data TEXT,
    category TEXT,
    amount_fen INTEGER,
    related_info TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX idx_activity_logs_project ON activity_logs(project_id, created_at DESC);
CREATE INDEX idx_activity_logs_created ON activity_logs(created_at DESC);
";
