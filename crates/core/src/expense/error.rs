//! Expense error types.

use fundtrack_shared::AppError;
use thiserror::Error;

/// A rejected row of a batch import. Rows are numbered as in a spreadsheet,
/// the header being row 1.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImportRowError {
    /// Spreadsheet row number.
    pub row: usize,
    /// What is wrong with it.
    pub message: String,
}

impl std::fmt::Display for ImportRowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.message)
    }
}

/// Expense-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    /// Content is required.
    #[error("expense content is required")]
    EmptyContent,

    /// Amount must be positive.
    #[error("expense amount must be greater than zero")]
    NonPositiveAmount,

    /// Expenses can only be booked against annual budgets.
    #[error("expenses must be booked against an annual budget")]
    TotalBudgetTarget,

    /// The import file lacks a required column.
    #[error("import file is missing the required column '{0}'")]
    MissingColumn(&'static str),

    /// The import file could not be read as CSV.
    #[error("import file is not valid CSV: {0}")]
    MalformedFile(String),

    /// The import file has no data rows.
    #[error("import file contains no expenses")]
    EmptyImport,

    /// One or more rows failed validation; nothing was imported.
    #[error("{} row(s) rejected: {}", .0.len(), format_rows(.0))]
    RowsRejected(Vec<ImportRowError>),
}

fn format_rows(rows: &[ImportRowError]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::TotalBudgetTarget => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
