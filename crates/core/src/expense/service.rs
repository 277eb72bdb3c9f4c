//! Expense validation and statistics.

use fundtrack_shared::types::Money;
use serde::Serialize;

use super::error::ExpenseError;
use super::types::{Expense, ExpenseInput};
use crate::budget::{BudgetCategory, CategoryAmounts};
use crate::project::clean_optional;

/// Spend of one category within a set of expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category.
    pub category: BudgetCategory,
    /// Number of expenses.
    pub count: usize,
    /// Sum in yuan.
    pub amount: Money,
}

/// Summary of a list of expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseStats {
    /// Number of expenses.
    pub count: usize,
    /// Sum in yuan.
    pub total: Money,
    /// Non-empty categories in display order.
    pub by_category: Vec<CategoryTotal>,
}

/// Expense service for business logic.
pub struct ExpenseService;

impl ExpenseService {
    /// Validates an expense and normalises its free-text fields.
    pub fn normalize(mut input: ExpenseInput) -> Result<ExpenseInput, ExpenseError> {
        input.content = input.content.trim().to_string();
        if input.content.is_empty() {
            return Err(ExpenseError::EmptyContent);
        }
        if !input.amount.is_positive() {
            return Err(ExpenseError::NonPositiveAmount);
        }
        input.specification = clean_optional(input.specification);
        input.supplier = clean_optional(input.supplier);
        input.remarks = clean_optional(input.remarks);
        Ok(input)
    }

    /// Spend per category, ready for budget usage.
    pub fn spent_by_category<I>(entries: I) -> CategoryAmounts
    where
        I: IntoIterator<Item = (BudgetCategory, Money)>,
    {
        entries.into_iter().collect()
    }

    /// Count and totals of `expenses`.
    #[must_use]
    pub fn stats(expenses: &[Expense]) -> ExpenseStats {
        let by_category = BudgetCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let (count, amount) = expenses
                    .iter()
                    .filter(|e| e.category == category)
                    .fold((0, Money::ZERO), |(n, sum), e| (n + 1, sum + e.amount));
                (count > 0).then_some(CategoryTotal {
                    category,
                    count,
                    amount,
                })
            })
            .collect();

        ExpenseStats {
            count: expenses.len(),
            total: expenses.iter().map(|e| e.amount).sum(),
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use fundtrack_shared::types::{BudgetId, ExpenseId, ProjectId};

    fn input(content: &str, fen: i64) -> ExpenseInput {
        ExpenseInput {
            category: BudgetCategory::Material,
            content: content.to_string(),
            specification: Some("  ".to_string()),
            supplier: Some(" Sinopharm ".to_string()),
            amount: Money::from_fen(fen),
            expense_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            remarks: None,
        }
    }

    fn expense(category: BudgetCategory, fen: i64) -> Expense {
        let now = Utc::now();
        Expense {
            id: ExpenseId::new(),
            project_id: ProjectId::new(),
            budget_id: BudgetId::new(),
            category,
            content: "item".to_string(),
            specification: None,
            supplier: None,
            amount: Money::from_fen(fen),
            expense_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            remarks: None,
            voucher_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_normalize() {
        let clean = ExpenseService::normalize(input(" reagents ", 100)).unwrap();
        assert_eq!(clean.content, "reagents");
        assert_eq!(clean.specification, None);
        assert_eq!(clean.supplier.as_deref(), Some("Sinopharm"));
    }

    #[test]
    fn test_normalize_rejects() {
        assert_eq!(
            ExpenseService::normalize(input(" ", 100)),
            Err(ExpenseError::EmptyContent)
        );
        assert_eq!(
            ExpenseService::normalize(input("x", 0)),
            Err(ExpenseError::NonPositiveAmount)
        );
        assert_eq!(
            ExpenseService::normalize(input("x", -5)),
            Err(ExpenseError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_spent_by_category_accumulates() {
        let spent = ExpenseService::spent_by_category([
            (BudgetCategory::Fuel, Money::from_fen(10)),
            (BudgetCategory::Fuel, Money::from_fen(15)),
            (BudgetCategory::Labor, Money::from_fen(1)),
        ]);
        assert_eq!(spent.get(BudgetCategory::Fuel), Money::from_fen(25));
        assert_eq!(spent.total(), Money::from_fen(26));
    }

    #[test]
    fn test_stats() {
        let expenses = vec![
            expense(BudgetCategory::Labor, 500),
            expense(BudgetCategory::Equipment, 1000),
            expense(BudgetCategory::Labor, 250),
        ];
        let stats = ExpenseService::stats(&expenses);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.total, Money::from_fen(1750));
        assert_eq!(stats.by_category.len(), 2);
        assert_eq!(stats.by_category[0].category, BudgetCategory::Equipment);
        assert_eq!(stats.by_category[1].count, 2);
        assert_eq!(stats.by_category[1].amount, Money::from_fen(750));
    }
}
