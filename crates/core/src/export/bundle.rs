//! JSON project bundles.
//!
//! A bundle carries one project with its budgets and expenses. Importing a
//! bundle creates a new project with fresh IDs; the IDs inside the bundle
//! only link expenses to budgets.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use fundtrack_shared::types::{BudgetId, Money};
use serde::{Deserialize, Serialize};

use super::error::ExportError;
use crate::budget::{Budget, BudgetError, BudgetService, CategoryAmounts};
use crate::expense::{Expense, ExpenseInput, ExpenseService};
use crate::project::{Project, ProjectInput, ProjectService};

/// Current bundle format.
pub const BUNDLE_FORMAT_VERSION: u32 = 1;

/// A budget inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleBudget {
    /// ID in the exporting database.
    pub id: BudgetId,
    /// `None` for the total budget.
    pub year: Option<i32>,
    /// Category allocations in wan.
    pub allocation: CategoryAmounts,
}

/// An expense inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleExpense {
    /// [`BundleBudget::id`] of the annual budget it belongs to.
    pub budget_id: BudgetId,
    /// Expense fields.
    #[serde(flatten)]
    pub expense: ExpenseInput,
}

/// Portable snapshot of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBundle {
    /// Format version, currently [`BUNDLE_FORMAT_VERSION`].
    pub format_version: u32,
    /// When the bundle was written.
    pub exported_at: DateTime<Utc>,
    /// Project fields.
    pub project: ProjectInput,
    /// Total budget first, then annual budgets by year.
    pub budgets: Vec<BundleBudget>,
    /// Expenses by date.
    pub expenses: Vec<BundleExpense>,
}

impl ProjectBundle {
    /// Snapshots stored records.
    #[must_use]
    pub fn from_records(
        project: &Project,
        budgets: &[Budget],
        expenses: &[Expense],
        exported_at: DateTime<Utc>,
    ) -> Self {
        let mut budgets: Vec<BundleBudget> = budgets
            .iter()
            .map(|b| BundleBudget {
                id: b.id,
                year: b.year,
                allocation: b.allocation.clone(),
            })
            .collect();
        budgets.sort_by_key(|b| b.year);

        let mut expenses: Vec<BundleExpense> = expenses
            .iter()
            .map(|e| BundleExpense {
                budget_id: e.budget_id,
                expense: ExpenseInput {
                    category: e.category,
                    content: e.content.clone(),
                    specification: e.specification.clone(),
                    supplier: e.supplier.clone(),
                    amount: e.amount,
                    expense_date: e.expense_date,
                    remarks: e.remarks.clone(),
                },
            })
            .collect();
        expenses.sort_by_key(|e| e.expense.expense_date);

        Self {
            format_version: BUNDLE_FORMAT_VERSION,
            exported_at,
            project: ProjectInput {
                name: project.name.clone(),
                financial_code: project.financial_code.clone(),
                project_code: project.project_code.clone(),
                project_type: project.project_type.clone(),
                leader: project.leader.clone(),
                start_date: project.start_date,
                end_date: project.end_date,
            },
            budgets,
            expenses,
        }
    }

    /// The total budget entry.
    #[must_use]
    pub fn total_budget(&self) -> Option<&BundleBudget> {
        self.budgets.iter().find(|b| b.year.is_none())
    }

    /// Checks the bundle and returns it with every record normalised.
    ///
    /// # Errors
    ///
    /// Any rule a direct edit would enforce: valid project fields, one
    /// total budget, unique valid years, annual budgets within the total,
    /// expenses valid and booked against annual budgets of the bundle.
    pub fn validate(mut self) -> Result<Self, ExportError> {
        if self.format_version != BUNDLE_FORMAT_VERSION {
            return Err(ExportError::UnsupportedVersion(self.format_version));
        }
        self.project = ProjectService::normalize(self.project)?;

        let mut total = None;
        let mut years = HashSet::new();
        let mut annual_by_id = HashMap::new();
        let mut annual_sum = Money::ZERO;
        for budget in &self.budgets {
            if let Some((category, _)) = budget.allocation.iter().find(|(_, m)| m.is_negative()) {
                return Err(BudgetError::NegativeAmount(category).into());
            }
            match budget.year {
                None if total.is_some() => return Err(ExportError::DuplicateTotalBudget),
                None => total = Some(budget),
                Some(year) => {
                    BudgetService::validate_year(year)?;
                    if !years.insert(year) {
                        return Err(BudgetError::DuplicateYear(year).into());
                    }
                    let amount = BudgetService::validate_allocation(&budget.allocation)?;
                    annual_sum = annual_sum
                        .checked_add(amount)
                        .ok_or(BudgetError::AmountTooLarge)?;
                    annual_by_id.insert(budget.id, year);
                }
            }
        }
        let total = total.ok_or(ExportError::MissingTotalBudget)?;
        let total_amount = total
            .allocation
            .checked_total()
            .ok_or(BudgetError::AmountTooLarge)?;
        BudgetService::validate_total_update(total_amount, annual_sum)?;
        let total_id = total.id;

        for expense in &mut self.expenses {
            if expense.budget_id == total_id {
                return Err(ExportError::ExpenseOnTotalBudget);
            }
            if !annual_by_id.contains_key(&expense.budget_id) {
                return Err(ExportError::UnknownBudget(expense.budget_id));
            }
            expense.expense = ExpenseService::normalize(expense.expense.clone())?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetCategory;
    use chrono::NaiveDate;
    use fundtrack_shared::types::{ExpenseId, ProjectId};

    fn wan(n: i64) -> Money {
        Money::from_fen(n * 1_000_000)
    }

    fn budget(project_id: ProjectId, year: Option<i32>, equipment: i64) -> Budget {
        let now = Utc::now();
        let allocation: CategoryAmounts =
            [(BudgetCategory::Equipment, wan(equipment))].into_iter().collect();
        Budget {
            id: BudgetId::new(),
            project_id,
            year,
            total_amount: allocation.total(),
            allocation,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> ProjectBundle {
        let now = Utc::now();
        let project = Project {
            id: ProjectId::new(),
            name: "Soil carbon".to_string(),
            financial_code: Some("F-01".to_string()),
            project_code: None,
            project_type: None,
            leader: Some("Wang".to_string()),
            start_date: None,
            end_date: None,
            total_budget: wan(100),
            created_at: now,
            updated_at: now,
        };
        let annual = budget(project.id, Some(2024), 40);
        let budgets = vec![annual.clone(), budget(project.id, None, 100)];
        let expenses = vec![Expense {
            id: ExpenseId::new(),
            project_id: project.id,
            budget_id: annual.id,
            category: BudgetCategory::Equipment,
            content: "Analyser".to_string(),
            specification: None,
            supplier: None,
            amount: Money::from_fen(1_250_000),
            expense_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            remarks: None,
            voucher_key: Some("vouchers/x".to_string()),
            created_at: now,
            updated_at: now,
        }];
        ProjectBundle::from_records(&project, &budgets, &expenses, now)
    }

    #[test]
    fn test_from_records_orders_total_first() {
        let bundle = sample();
        assert_eq!(bundle.budgets[0].year, None);
        assert_eq!(bundle.budgets[1].year, Some(2024));
        assert_eq!(bundle.total_budget().map(|b| b.allocation.total()), Some(wan(100)));
        assert_eq!(bundle.expenses[0].budget_id, bundle.budgets[1].id);
    }

    #[test]
    fn test_json_round_trip_validates() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"amount\":\"12500.00\""));
        let parsed: ProjectBundle = serde_json::from_str(&json).unwrap();
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_rejects_structural_problems() {
        let mut bundle = sample();
        bundle.format_version = 2;
        assert_eq!(bundle.validate(), Err(ExportError::UnsupportedVersion(2)));

        let mut bundle = sample();
        bundle.budgets.remove(0);
        assert_eq!(bundle.validate(), Err(ExportError::MissingTotalBudget));

        let mut bundle = sample();
        let total = bundle.budgets[0].id;
        bundle.expenses[0].budget_id = total;
        assert_eq!(bundle.validate(), Err(ExportError::ExpenseOnTotalBudget));

        let mut bundle = sample();
        let stray = BudgetId::new();
        bundle.expenses[0].budget_id = stray;
        assert_eq!(bundle.validate(), Err(ExportError::UnknownBudget(stray)));
    }

    #[test]
    fn test_rejects_annual_over_total() {
        let mut bundle = sample();
        bundle.budgets[1]
            .allocation
            .set(BudgetCategory::Equipment, wan(150));
        assert!(matches!(
            bundle.validate(),
            Err(ExportError::Budget(BudgetError::BelowAnnualSum { .. }))
        ));
    }

    #[test]
    fn test_rejects_overflowing_amounts() {
        let mut bundle = sample();
        let half = Money::from_fen(i64::MAX / 2 + 1);
        bundle.budgets[0].allocation.set(BudgetCategory::Equipment, half);
        bundle.budgets[0].allocation.set(BudgetCategory::Material, half);
        assert_eq!(
            bundle.validate(),
            Err(ExportError::Budget(BudgetError::AmountTooLarge))
        );
    }
}
