//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written as raw SQLite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_budgets;
mod m20260301_000002_records;
mod m20260301_000003_budget_plans;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_budgets::Migration),
            Box::new(m20260301_000002_records::Migration),
            Box::new(m20260301_000003_budget_plans::Migration),
        ]
    }
}
