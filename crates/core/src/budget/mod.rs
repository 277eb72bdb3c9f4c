//! Total and annual budgets with per-category allocations.
//!
//! A project has exactly one total budget (year = `None`) and at most one
//! annual budget per year. Expenses are booked against annual budgets only;
//! the total budget's spend is the sum over its annual budgets.

pub mod category;
pub mod error;
pub mod service;
pub mod types;


pub use category::BudgetCategory;
pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{
    AllocationInput, AnnualBudgetInput, AnnualBudgetSnapshot, Budget, BudgetUsage,
    CategoryAmounts, CategoryUsage, ProjectBudgetOverview,
};
