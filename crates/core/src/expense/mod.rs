//! Expense records booked against annual budgets.

pub mod error;
pub mod filter;
pub mod import;
pub mod service;
pub mod types;

pub use error::{ExpenseError, ImportRowError};
pub use filter::ExpenseFilter;
pub use import::{IMPORT_TEMPLATE_HEADERS, expense_csv_template, parse_expense_csv};
pub use service::{CategoryTotal, ExpenseService, ExpenseStats};
pub use types::{Expense, ExpenseInput};
