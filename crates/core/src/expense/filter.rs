//! Expense list filtering.

use fundtrack_shared::types::Money;
use serde::{Deserialize, Serialize};

use super::types::Expense;
use crate::budget::BudgetCategory;
use crate::filter::{DateRange, keyword_matches};

/// Criteria for narrowing an expense list. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    /// Substring of content, specification, supplier or remarks.
    pub keyword: Option<String>,
    /// Exact category.
    pub category: Option<BudgetCategory>,
    /// Inclusive date range.
    #[serde(flatten)]
    pub dates: DateRange,
    /// Inclusive lower amount bound in yuan.
    pub min_amount: Option<Money>,
    /// Inclusive upper amount bound in yuan.
    pub max_amount: Option<Money>,
}

impl ExpenseFilter {
    /// Whether `expense` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        keyword_matches(
            self.keyword.as_deref(),
            &[
                Some(expense.content.as_str()),
                expense.specification.as_deref(),
                expense.supplier.as_deref(),
                expense.remarks.as_deref(),
            ],
        ) && self.category.is_none_or(|c| c == expense.category)
            && self.dates.contains(Some(expense.expense_date))
            && self.min_amount.is_none_or(|min| expense.amount >= min)
            && self.max_amount.is_none_or(|max| expense.amount <= max)
    }

    /// Keeps only matching expenses.
    #[must_use]
    pub fn apply(&self, expenses: Vec<Expense>) -> Vec<Expense> {
        expenses.into_iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use fundtrack_shared::types::{BudgetId, ExpenseId, ProjectId};

    fn expense(category: BudgetCategory, content: &str, fen: i64, day: u32) -> Expense {
        let now = Utc::now();
        Expense {
            id: ExpenseId::new(),
            project_id: ProjectId::new(),
            budget_id: BudgetId::new(),
            category,
            content: content.to_string(),
            specification: None,
            supplier: Some("Acme Instruments".to_string()),
            amount: Money::from_fen(fen),
            expense_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            remarks: None,
            voucher_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(BudgetCategory::Equipment, "Oscilloscope", 500_000, 3),
            expense(BudgetCategory::Material, "Pipette tips", 12_000, 10),
            expense(BudgetCategory::Conference, "Flight to Beijing", 180_000, 20),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        assert_eq!(ExpenseFilter::default().apply(sample()).len(), 3);
    }

    #[test]
    fn test_keyword_and_category() {
        let filter = ExpenseFilter {
            keyword: Some("acme".to_string()),
            category: Some(BudgetCategory::Material),
            ..ExpenseFilter::default()
        };
        let result = filter.apply(sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content, "Pipette tips");
    }

    #[test]
    fn test_date_and_amount_ranges_are_inclusive() {
        let filter = ExpenseFilter {
            dates: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 5, 3),
                NaiveDate::from_ymd_opt(2024, 5, 10),
            ),
            min_amount: Some(Money::from_fen(12_000)),
            max_amount: Some(Money::from_fen(500_000)),
            ..ExpenseFilter::default()
        };
        assert_eq!(filter.apply(sample()).len(), 2);
    }
}
