//! Budget service for allocation rules and usage calculation.

use fundtrack_shared::types::{Money, execution_rate};

use super::category::BudgetCategory;
use super::error::BudgetError;
use super::types::{
    AnnualBudgetSnapshot, BudgetUsage, CategoryAmounts, CategoryUsage, ProjectBudgetOverview,
};

/// Earliest accepted budget year.
pub const MIN_YEAR: i32 = 1990;
/// Latest accepted budget year.
pub const MAX_YEAR: i32 = 2100;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Validates an allocation and returns its total.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAmount` for a negative line,
    /// `BudgetError::AmountTooLarge` when the lines cannot be summed and
    /// `BudgetError::EmptyBudget` when the total is not positive.
    pub fn validate_allocation(allocation: &CategoryAmounts) -> Result<Money, BudgetError> {
        if let Some((category, _)) = allocation.iter().find(|(_, amount)| amount.is_negative()) {
            return Err(BudgetError::NegativeAmount(category));
        }
        let total = allocation
            .checked_total()
            .ok_or(BudgetError::AmountTooLarge)?;
        if !total.is_positive() {
            return Err(BudgetError::EmptyBudget);
        }
        Ok(total)
    }

    /// Checks a year against the accepted range.
    pub fn validate_year(year: i32) -> Result<(), BudgetError> {
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Ok(())
        } else {
            Err(BudgetError::InvalidYear(year))
        }
    }

    /// Rules for adding an annual budget.
    ///
    /// The total budget must be funded, must still have a positive balance,
    /// and the requested amount must fit into that balance.
    pub fn validate_new_annual(
        total_budget: Money,
        annual_sum: Money,
        requested: Money,
    ) -> Result<(), BudgetError> {
        if !total_budget.is_positive() {
            return Err(BudgetError::TotalBudgetNotSet);
        }
        let remaining = total_budget - annual_sum;
        if !remaining.is_positive() {
            return Err(BudgetError::NoRemainingBalance);
        }
        if requested > remaining {
            return Err(BudgetError::ExceedsRemaining {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    /// Rules for changing the total budget.
    pub fn validate_total_update(new_total: Money, annual_sum: Money) -> Result<(), BudgetError> {
        if new_total < annual_sum {
            return Err(BudgetError::BelowAnnualSum {
                total: new_total,
                annual_sum,
            });
        }
        Ok(())
    }

    /// Rules for changing an annual budget. Returns the new annual total.
    ///
    /// `other_annual_sum` excludes the budget being edited.
    pub fn validate_annual_update(
        total_budget: Money,
        other_annual_sum: Money,
        allocation: &CategoryAmounts,
        spent: &CategoryAmounts,
    ) -> Result<Money, BudgetError> {
        let new_total = Self::validate_allocation(allocation)?;

        let available = total_budget - other_annual_sum;
        if new_total > available {
            return Err(BudgetError::ExceedsRemaining {
                requested: new_total,
                remaining: available,
            });
        }

        let spent_total = spent.total();
        if new_total < spent_total {
            return Err(BudgetError::BelowSpent {
                allocated: new_total,
                spent: spent_total,
            });
        }

        for category in BudgetCategory::ALL {
            let allocated = allocation.get(category);
            let used = spent.get(category);
            if allocated < used {
                return Err(BudgetError::CategoryBelowSpent {
                    category,
                    allocated,
                    spent: used,
                });
            }
        }

        Ok(new_total)
    }

    /// Per-category and aggregate usage of one budget.
    #[must_use]
    pub fn usage(
        year: Option<i32>,
        allocation: &CategoryAmounts,
        spent: &CategoryAmounts,
    ) -> BudgetUsage {
        let lines: Vec<CategoryUsage> = BudgetCategory::ALL
            .into_iter()
            .map(|c| CategoryUsage::new(c, allocation.get(c), spent.get(c)))
            .collect();
        let allocated = allocation.total();
        let spent = spent.total();

        BudgetUsage {
            budget_id: None,
            year,
            allocated,
            spent,
            remaining: allocated - spent,
            execution_rate: execution_rate(spent, allocated),
            lines,
        }
    }

    /// Usage of the total budget and of every annual budget.
    #[must_use]
    pub fn overview(
        total_allocation: &CategoryAmounts,
        annual: &[AnnualBudgetSnapshot],
    ) -> ProjectBudgetOverview {
        let mut rolled_up = CategoryAmounts::new();
        let mut annual_usage = Vec::with_capacity(annual.len());
        for snapshot in annual {
            rolled_up.merge(&snapshot.spent);
            annual_usage.push(Self::usage(
                Some(snapshot.year),
                &snapshot.allocation,
                &snapshot.spent,
            ));
        }
        annual_usage.sort_by_key(|u| u.year);

        let allocated_to_years: Money = annual.iter().map(|s| s.allocation.total()).sum();
        let total = Self::usage(None, total_allocation, &rolled_up);
        let unallocated = total.allocated - allocated_to_years;

        ProjectBudgetOverview {
            total,
            annual: annual_usage,
            allocated_to_years,
            unallocated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wan(n: i64) -> Money {
        Money::from_fen(n * 1_000_000)
    }

    fn amounts(entries: &[(BudgetCategory, Money)]) -> CategoryAmounts {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_validate_allocation() {
        let alloc = amounts(&[
            (BudgetCategory::Equipment, wan(30)),
            (BudgetCategory::Material, wan(20)),
        ]);
        assert_eq!(BudgetService::validate_allocation(&alloc), Ok(wan(50)));

        assert_eq!(
            BudgetService::validate_allocation(&CategoryAmounts::zeroed()),
            Err(BudgetError::EmptyBudget)
        );

        let negative = amounts(&[
            (BudgetCategory::Equipment, wan(30)),
            (BudgetCategory::Labor, -wan(1)),
        ]);
        assert_eq!(
            BudgetService::validate_allocation(&negative),
            Err(BudgetError::NegativeAmount(BudgetCategory::Labor))
        );
    }

    #[test]
    fn test_validate_allocation_rejects_overflowing_sum() {
        let half = Money::from_fen(i64::MAX / 2 + 1);
        let alloc = amounts(&[
            (BudgetCategory::Equipment, half),
            (BudgetCategory::Material, half),
        ]);
        assert_eq!(
            BudgetService::validate_allocation(&alloc),
            Err(BudgetError::AmountTooLarge)
        );
        assert_eq!(alloc.checked_total(), None);
    }

    #[test]
    fn test_new_annual_requires_total() {
        assert_eq!(
            BudgetService::validate_new_annual(Money::ZERO, Money::ZERO, wan(1)),
            Err(BudgetError::TotalBudgetNotSet)
        );
    }

    #[test]
    fn test_new_annual_requires_balance() {
        assert_eq!(
            BudgetService::validate_new_annual(wan(100), wan(100), wan(1)),
            Err(BudgetError::NoRemainingBalance)
        );
    }

    #[test]
    fn test_new_annual_within_balance() {
        assert!(BudgetService::validate_new_annual(wan(100), wan(60), wan(40)).is_ok());
        assert_eq!(
            BudgetService::validate_new_annual(wan(100), wan(60), wan(41)),
            Err(BudgetError::ExceedsRemaining {
                requested: wan(41),
                remaining: wan(40),
            })
        );
    }

    #[test]
    fn test_total_update_not_below_annuals() {
        assert!(BudgetService::validate_total_update(wan(80), wan(80)).is_ok());
        assert!(matches!(
            BudgetService::validate_total_update(wan(79), wan(80)),
            Err(BudgetError::BelowAnnualSum { .. })
        ));
    }

    #[test]
    fn test_annual_update_checks_spend_per_category() {
        let alloc = amounts(&[
            (BudgetCategory::Equipment, wan(10)),
            (BudgetCategory::Material, wan(10)),
        ]);
        let spent = amounts(&[(BudgetCategory::Material, wan(12))]);

        let err = BudgetService::validate_annual_update(wan(100), Money::ZERO, &alloc, &spent)
            .unwrap_err();
        assert_eq!(
            err,
            BudgetError::CategoryBelowSpent {
                category: BudgetCategory::Material,
                allocated: wan(10),
                spent: wan(12),
            }
        );
    }

    #[test]
    fn test_annual_update_checks_available_and_total_spend() {
        let alloc = amounts(&[(BudgetCategory::Equipment, wan(50))]);
        let nothing_spent = CategoryAmounts::new();
        assert!(matches!(
            BudgetService::validate_annual_update(wan(100), wan(60), &alloc, &nothing_spent),
            Err(BudgetError::ExceedsRemaining { .. })
        ));

        let spent = amounts(&[(BudgetCategory::Labor, wan(51))]);
        assert!(matches!(
            BudgetService::validate_annual_update(wan(100), Money::ZERO, &alloc, &spent),
            Err(BudgetError::BelowSpent { .. })
        ));

        assert_eq!(
            BudgetService::validate_annual_update(wan(100), wan(50), &alloc, &nothing_spent),
            Ok(wan(50))
        );
    }

    #[test]
    fn test_usage_lines_cover_every_category() {
        let alloc = amounts(&[(BudgetCategory::Equipment, wan(10))]);
        let spent = amounts(&[(BudgetCategory::Equipment, wan(4))]);
        let usage = BudgetService::usage(Some(2024), &alloc, &spent);

        assert_eq!(usage.lines.len(), 10);
        assert_eq!(usage.allocated, wan(10));
        assert_eq!(usage.spent, wan(4));
        assert_eq!(usage.remaining, wan(6));
        assert_eq!(usage.execution_rate, dec!(40));
        let fuel = usage
            .lines
            .iter()
            .find(|l| l.category == BudgetCategory::Fuel)
            .unwrap();
        assert_eq!(fuel.execution_rate, dec!(0));
    }

    #[test]
    fn test_overview_rolls_up_annual_spend() {
        let total = amounts(&[
            (BudgetCategory::Equipment, wan(60)),
            (BudgetCategory::Labor, wan(40)),
        ]);
        let annual = vec![
            AnnualBudgetSnapshot {
                year: 2025,
                allocation: amounts(&[(BudgetCategory::Labor, wan(20))]),
                spent: amounts(&[(BudgetCategory::Labor, wan(5))]),
            },
            AnnualBudgetSnapshot {
                year: 2024,
                allocation: amounts(&[(BudgetCategory::Equipment, wan(30))]),
                spent: amounts(&[
                    (BudgetCategory::Equipment, wan(10)),
                    (BudgetCategory::Labor, wan(1)),
                ]),
            },
        ];

        let overview = BudgetService::overview(&total, &annual);
        assert_eq!(overview.total.allocated, wan(100));
        assert_eq!(overview.total.spent, wan(16));
        assert_eq!(overview.allocated_to_years, wan(50));
        assert_eq!(overview.unallocated, wan(50));
        assert_eq!(overview.annual[0].year, Some(2024));
        assert_eq!(overview.annual[1].year, Some(2025));

        let labor = overview
            .total
            .lines
            .iter()
            .find(|l| l.category == BudgetCategory::Labor)
            .unwrap();
        assert_eq!(labor.spent, wan(6));
        assert_eq!(labor.execution_rate, dec!(15));
    }

    #[test]
    fn test_validate_year() {
        assert!(BudgetService::validate_year(2024).is_ok());
        assert_eq!(
            BudgetService::validate_year(1800),
            Err(BudgetError::InvalidYear(1800))
        );
    }
}
