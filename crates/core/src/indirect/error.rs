//! Indirect-cost calculator errors.

use fundtrack_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Invalid calculator input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndirectCostError {
    /// A money input is negative.
    #[error("{field} cannot be negative (got {value})")]
    NegativeInput {
        /// Input name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// A money input is beyond the supported range.
    #[error("{field} is too large (got {value})")]
    TooLarge {
        /// Input name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// A rate is outside 0..=100 percent.
    #[error("rate {0}% is outside 0-100")]
    InvalidRate(Decimal),
}

impl From<IndirectCostError> for AppError {
    fn from(err: IndirectCostError) -> Self {
        Self::Validation(err.to_string())
    }
}
