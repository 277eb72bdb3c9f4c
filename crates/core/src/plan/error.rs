//! Budget plan error types.

use fundtrack_shared::AppError;
use thiserror::Error;

use super::types::{PlanCategory, PlanSubcategory};

/// Errors raised while validating a budget plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Plan name is blank.
    #[error("plan name is required")]
    EmptyName,

    /// An item name is blank.
    #[error("item name is required")]
    EmptyItemName,

    /// Unit price below zero.
    #[error("unit price of '{0}' must not be negative")]
    NegativeUnitPrice(String),

    /// Subcategory belongs to the other category.
    #[error("subcategory {subcategory} does not belong to {category} costs")]
    SubcategoryMismatch {
        /// Given subcategory.
        subcategory: PlanSubcategory,
        /// Given category.
        category: PlanCategory,
    },

    /// Amounts overflowed.
    #[error("amount of '{0}' is too large")]
    Overflow(String),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        Self::Validation(err.to_string())
    }
}
