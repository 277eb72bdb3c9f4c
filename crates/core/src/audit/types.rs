//! Activity log entry types.

use chrono::{DateTime, Utc};
use fundtrack_shared::types::{ActivityLogId, BudgetId, ExpenseId, Money, ProjectId};
use serde::{Deserialize, Serialize};

use crate::budget::BudgetCategory;

coded_enum! {
    /// What kind of record was touched.
    pub enum EntityKind {
        /// Research project.
        Project => "project",
        /// Total or annual budget.
        Budget => "budget",
        /// Expense.
        Expense => "expense",
        /// Project task.
        Task => "task",
        /// Research outcome.
        Outcome => "outcome",
        /// Project document.
        Document => "document",
    }
}

coded_enum! {
    /// What happened to it.
    pub enum ActionKind {
        /// Created.
        Create => "create",
        /// Modified.
        Update => "update",
        /// Removed.
        Delete => "delete",
        /// Batch-imported.
        Import => "import",
    }
}

/// A log entry before it is stored.
///
/// Built with [`ActivityEntry::new`] and the chained setters:
///
/// ```
/// use fundtrack_core::audit::{ActionKind, ActivityEntry, EntityKind};
///
/// let entry = ActivityEntry::new(EntityKind::Project, ActionKind::Create, "created project")
///     .by("alice");
/// assert_eq!(entry.operator, "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Project the change belongs to.
    pub project_id: Option<ProjectId>,
    /// Budget the change belongs to.
    pub budget_id: Option<BudgetId>,
    /// Expense the change belongs to.
    pub expense_id: Option<ExpenseId>,
    /// Record kind.
    pub entity: EntityKind,
    /// Action.
    pub action: ActionKind,
    /// Human-readable summary.
    pub description: String,
    /// Who made the change.
    pub operator: String,
    /// State before the change.
    pub old_data: Option<serde_json::Value>,
    /// State after the change.
    pub new_data: Option<serde_json::Value>,
    /// Expense category, for expense entries.
    pub category: Option<BudgetCategory>,
    /// Amount involved, in yuan.
    pub amount: Option<Money>,
    /// Extra context such as the budget year.
    pub related_info: Option<String>,
}

impl ActivityEntry {
    /// Starts an entry with no links and an empty operator.
    pub fn new(entity: EntityKind, action: ActionKind, description: impl Into<String>) -> Self {
        Self {
            project_id: None,
            budget_id: None,
            expense_id: None,
            entity,
            action,
            description: description.into(),
            operator: String::new(),
            old_data: None,
            new_data: None,
            category: None,
            amount: None,
            related_info: None,
        }
    }

    /// Links the entry to a project.
    #[must_use]
    pub const fn project(mut self, id: ProjectId) -> Self {
        self.project_id = Some(id);
        self
    }

    /// Links the entry to a budget.
    #[must_use]
    pub const fn budget(mut self, id: BudgetId) -> Self {
        self.budget_id = Some(id);
        self
    }

    /// Links the entry to an expense.
    #[must_use]
    pub const fn expense(mut self, id: ExpenseId) -> Self {
        self.expense_id = Some(id);
        self
    }

    /// Sets the operator.
    #[must_use]
    pub fn by(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Records the state before the change.
    ///
    /// Values that fail to serialize are left out.
    #[must_use]
    pub fn before<T: Serialize>(mut self, value: &T) -> Self {
        self.old_data = serde_json::to_value(value).ok();
        self
    }

    /// Records the state after the change.
    #[must_use]
    pub fn after<T: Serialize>(mut self, value: &T) -> Self {
        self.new_data = serde_json::to_value(value).ok();
        self
    }

    /// Sets the expense category.
    #[must_use]
    pub const fn category(mut self, category: BudgetCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the amount.
    #[must_use]
    pub const fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets free-form related info.
    #[must_use]
    pub fn related(mut self, info: impl Into<String>) -> Self {
        self.related_info = Some(info.into());
        self
    }
}

/// A stored log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Entry ID.
    pub id: ActivityLogId,
    /// When the change was committed.
    pub timestamp: DateTime<Utc>,
    /// Entry payload.
    #[serde(flatten)]
    pub entry: ActivityEntry,
}

/// Criteria for listing the log. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFilter {
    /// Only entries for this project.
    pub project_id: Option<ProjectId>,
    /// Only entries about this kind of record.
    pub entity: Option<EntityKind>,
    /// Only entries with this action.
    pub action: Option<ActionKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Snapshot {
        name: &'static str,
        amount: Money,
    }

    #[test]
    fn test_builder_links_and_payloads() {
        let project = ProjectId::new();
        let expense = ExpenseId::new();
        let entry = ActivityEntry::new(EntityKind::Expense, ActionKind::Update, "edited expense")
            .project(project)
            .expense(expense)
            .by("lab admin")
            .before(&Snapshot {
                name: "Reagent",
                amount: Money::from_fen(10_000),
            })
            .after(&Snapshot {
                name: "Reagent",
                amount: Money::from_fen(12_050),
            })
            .category(BudgetCategory::Material)
            .amount(Money::from_fen(12_050));

        assert_eq!(entry.project_id, Some(project));
        assert_eq!(entry.expense_id, Some(expense));
        assert_eq!(entry.budget_id, None);
        assert_eq!(entry.operator, "lab admin");
        assert_eq!(
            entry.old_data,
            Some(serde_json::json!({ "name": "Reagent", "amount": "100.00" }))
        );
        assert_eq!(
            entry.new_data.as_ref().and_then(|v| v["amount"].as_str()),
            Some("120.50")
        );
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = ActivityRecord {
            id: ActivityLogId::new(),
            timestamp: Utc::now(),
            entry: ActivityEntry::new(EntityKind::Budget, ActionKind::Delete, "removed 2024")
                .related("year 2024"),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["entity"], "budget");
        assert_eq!(json["action"], "delete");
        assert_eq!(json["related_info"], "year 2024");
    }
}
