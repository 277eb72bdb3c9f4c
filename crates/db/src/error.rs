//! Repository error type.

use fundtrack_core::budget::BudgetError;
use fundtrack_core::expense::ExpenseError;
use fundtrack_core::export::ExportError;
use fundtrack_core::plan::PlanError;
use fundtrack_core::progress::ProgressError;
use fundtrack_core::project::ProjectError;
use fundtrack_core::records::RecordError;
use fundtrack_shared::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by every repository in this crate.
///
/// Domain rule violations keep their core error so callers can match on
/// them; everything from the driver lands in `Database`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Requested ID.
        id: Uuid,
    },

    /// Budget rule violated.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Expense rule violated.
    #[error(transparent)]
    Expense(#[from] ExpenseError),

    /// Project rule violated.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Task rule violated.
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// Outcome, document or academic activity rule violated.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Budget plan rule violated.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Bundle rejected.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    pub(crate) const fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::Budget(e) => e.into(),
            RepositoryError::Expense(e) => e.into(),
            RepositoryError::Project(e) => e.into(),
            RepositoryError::Progress(e) => e.into(),
            RepositoryError::Record(e) => e.into(),
            RepositoryError::Plan(e) => e.into(),
            RepositoryError::Export(e) => e.into(),
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, "database error");
                Self::Database(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_mapping() {
        let id = Uuid::now_v7();
        let err: AppError = RepositoryError::not_found("project", id).into();
        assert_eq!(err.status_code(), 404);
        assert!(err.message().contains(&id.to_string()));

        let err: AppError = RepositoryError::from(BudgetError::DuplicateYear(2024)).into();
        assert_eq!(err.status_code(), 409);

        let err: AppError = RepositoryError::from(ExpenseError::TotalBudgetTarget).into();
        assert_eq!(err.status_code(), 422);

        let err: AppError = RepositoryError::from(DbErr::Custom("boom".into())).into();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }
}
