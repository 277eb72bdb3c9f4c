//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `BudgetId` where an `ExpenseId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(ProjectId, "Unique identifier for a research project.");
typed_id!(BudgetId, "Unique identifier for a total or annual budget.");
typed_id!(BudgetItemId, "Unique identifier for a per-category budget line.");
typed_id!(ExpenseId, "Unique identifier for an expense record.");
typed_id!(ActivityLogId, "Unique identifier for an activity log entry.");
typed_id!(TaskId, "Unique identifier for a project task.");
typed_id!(OutcomeId, "Unique identifier for a project outcome.");
typed_id!(DocumentId, "Unique identifier for a project document.");
typed_id!(AcademicActivityId, "Unique identifier for an academic activity.");
typed_id!(BudgetPlanId, "Unique identifier for a budget plan.");
typed_id!(PlanItemId, "Unique identifier for a budget plan line.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ProjectId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_typed_ids_are_unique() {
        let first = ExpenseId::new();
        let second = ExpenseId::new();
        assert_ne!(first, second);
        assert_eq!(first.into_inner().get_version_num(), 7);
    }

    #[test]
    fn test_typed_id_parse() {
        let uuid = Uuid::new_v4();
        let parsed = BudgetId::from_str(&uuid.to_string()).unwrap();
        assert_eq!(parsed.into_inner(), uuid);
        assert!(BudgetId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_typed_id_serde_transparent() {
        let id = TaskId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
