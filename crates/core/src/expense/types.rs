//! Expense data types.

use chrono::{DateTime, NaiveDate, Utc};
use fundtrack_shared::types::{BudgetId, ExpenseId, Money, ProjectId};
use serde::{Deserialize, Serialize};

use crate::budget::BudgetCategory;

/// A reimbursement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Annual budget the expense is booked against.
    pub budget_id: BudgetId,
    /// Category.
    pub category: BudgetCategory,
    /// What was bought or paid for.
    pub content: String,
    /// Model / specification.
    pub specification: Option<String>,
    /// Supplier.
    pub supplier: Option<String>,
    /// Amount in yuan.
    pub amount: Money,
    /// Reimbursement date.
    pub expense_date: NaiveDate,
    /// Remarks.
    pub remarks: Option<String>,
    /// Storage key of the scanned voucher.
    pub voucher_key: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseInput {
    /// Category.
    pub category: BudgetCategory,
    /// What was bought or paid for.
    pub content: String,
    /// Model / specification.
    #[serde(default)]
    pub specification: Option<String>,
    /// Supplier.
    #[serde(default)]
    pub supplier: Option<String>,
    /// Amount in yuan.
    pub amount: Money,
    /// Reimbursement date.
    pub expense_date: NaiveDate,
    /// Remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}
