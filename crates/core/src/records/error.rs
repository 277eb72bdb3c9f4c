//! Record validation errors.

use chrono::NaiveDate;
use fundtrack_shared::AppError;
use thiserror::Error;

/// Errors shared by outcomes, documents and academic activities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Name is required.
    #[error("name is required")]
    EmptyName,

    /// Two dates are in the wrong order.
    #[error("{later_field} {later} is before {earlier_field} {earlier}")]
    DateOrder {
        /// Field that should come first.
        earlier_field: &'static str,
        /// Its value.
        earlier: NaiveDate,
        /// Field that should come second.
        later_field: &'static str,
        /// Its value.
        later: NaiveDate,
    },
}

impl RecordError {
    pub(crate) fn check_order(
        earlier_field: &'static str,
        earlier: Option<NaiveDate>,
        later_field: &'static str,
        later: Option<NaiveDate>,
    ) -> Result<(), Self> {
        match (earlier, later) {
            (Some(earlier), Some(later)) if later < earlier => Err(Self::DateOrder {
                earlier_field,
                earlier,
                later_field,
                later,
            }),
            _ => Ok(()),
        }
    }
}

pub(crate) fn require_name(name: &str) -> Result<String, RecordError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RecordError::EmptyName);
    }
    Ok(name.to_string())
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        Self::Validation(err.to_string())
    }
}
