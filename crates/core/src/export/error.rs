//! Export and import error types.

use fundtrack_shared::AppError;
use fundtrack_shared::types::BudgetId;
use thiserror::Error;

use crate::budget::BudgetError;
use crate::expense::ExpenseError;
use crate::project::ProjectError;

/// Bundle and workbook errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Bundle written by an incompatible version.
    #[error("unsupported bundle format version {0}")]
    UnsupportedVersion(u32),

    /// Bundle without a total budget.
    #[error("bundle has no total budget")]
    MissingTotalBudget,

    /// Bundle with more than one total budget.
    #[error("bundle has more than one total budget")]
    DuplicateTotalBudget,

    /// Expense points at a budget that is not in the bundle.
    #[error("expense refers to unknown budget {0}")]
    UnknownBudget(BudgetId),

    /// Expense booked against the total budget.
    #[error("expenses must be booked against an annual budget")]
    ExpenseOnTotalBudget,

    /// Invalid project data.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Invalid budget data.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Invalid expense data.
    #[error(transparent)]
    Expense(#[from] ExpenseError),

    /// Spreadsheet generation failed.
    #[error("failed to build workbook: {0}")]
    Workbook(String),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook(err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Project(e) => e.into(),
            ExportError::Budget(e) => e.into(),
            ExportError::Expense(e) => e.into(),
            ExportError::Workbook(msg) => Self::Internal(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}
