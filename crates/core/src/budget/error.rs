//! Budget error types.

use fundtrack_shared::AppError;
use fundtrack_shared::types::Money;
use thiserror::Error;

use super::category::BudgetCategory;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Amount cannot be negative.
    #[error("amount for {0} cannot be negative")]
    NegativeAmount(BudgetCategory),

    /// Amounts too large to add up.
    #[error("budget amounts are too large")]
    AmountTooLarge,

    /// A budget must allocate something.
    #[error("budget total must be greater than zero")]
    EmptyBudget,

    /// Annual budgets need a funded total budget first.
    #[error("the total budget has not been set")]
    TotalBudgetNotSet,

    /// The total budget is fully handed out to annual budgets.
    #[error("the total budget has no remaining balance")]
    NoRemainingBalance,

    /// Annual amount larger than what the total budget still has.
    #[error(
        "annual budget of {} wan exceeds the remaining balance of {} wan",
        .requested.wan(),
        .remaining.wan()
    )]
    ExceedsRemaining {
        /// Requested annual total.
        requested: Money,
        /// Balance still available.
        remaining: Money,
    },

    /// Total budget reduced below what annual budgets already use.
    #[error(
        "total budget of {} wan is less than the {} wan allocated to annual budgets",
        .total.wan(),
        .annual_sum.wan()
    )]
    BelowAnnualSum {
        /// Proposed total.
        total: Money,
        /// Sum of annual budgets.
        annual_sum: Money,
    },

    /// Budget reduced below what was already spent.
    #[error(
        "budget of {} wan is less than the {} wan already spent",
        .allocated.wan(),
        .spent.wan()
    )]
    BelowSpent {
        /// Proposed allocation.
        allocated: Money,
        /// Already spent.
        spent: Money,
    },

    /// One category reduced below its spend.
    #[error(
        "{} allocation of {} wan is less than the {} wan already spent",
        .category.label(),
        .allocated.wan(),
        .spent.wan()
    )]
    CategoryBelowSpent {
        /// Category.
        category: BudgetCategory,
        /// Proposed allocation.
        allocated: Money,
        /// Already spent.
        spent: Money,
    },

    /// Year outside the accepted range.
    #[error("year {0} is out of range")]
    InvalidYear(i32),

    /// The project already has a budget for that year.
    #[error("an annual budget for {0} already exists")]
    DuplicateYear(i32),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NegativeAmount(_)
            | BudgetError::AmountTooLarge
            | BudgetError::EmptyBudget
            | BudgetError::InvalidYear(_) => {
                Self::Validation(err.to_string())
            }
            BudgetError::DuplicateYear(_) => Self::Conflict(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
