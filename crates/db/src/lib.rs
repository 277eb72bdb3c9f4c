//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations (SQLite)

mod codec;
pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use error::RepositoryError;
pub use migration::Migrator;
pub use repositories::{
    AcademicActivityRepository, ActivityLogRepository, AttachmentRepository, BudgetRepository,
    DocumentRepository, ExpenseRepository, ExportRepository, OutcomeRepository, PlanRepository,
    ProjectRepository, TaskRepository,
};

use std::time::Duration;

use fundtrack_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

/// Establishes a connection pool from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}

/// Opens a private in-memory database with every migration applied.
///
/// The pool holds a single connection so all queries see the same database.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(Duration::from_secs(24 * 60 * 60))
        .max_lifetime(Duration::from_secs(24 * 60 * 60))
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
