//! Budget data types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fundtrack_shared::types::money::wan;
use fundtrack_shared::types::{BudgetId, Money, ProjectId, execution_rate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::category::BudgetCategory;

/// Amounts keyed by category. Missing categories read as zero.
///
/// Used both for allocations and for spend totals. Serialized as a map of
/// category code to wan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryAmounts(BTreeMap<BudgetCategory, Money>);

impl CategoryAmounts {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every category present with a zero amount.
    #[must_use]
    pub fn zeroed() -> Self {
        BudgetCategory::ALL
            .into_iter()
            .map(|c| (c, Money::ZERO))
            .collect()
    }

    /// Amount for `category`, zero if absent.
    #[must_use]
    pub fn get(&self, category: BudgetCategory) -> Money {
        self.0.get(&category).copied().unwrap_or_default()
    }

    /// Replaces the amount for `category`.
    pub fn set(&mut self, category: BudgetCategory, amount: Money) {
        self.0.insert(category, amount);
    }

    /// Adds `amount` to `category`.
    pub fn add(&mut self, category: BudgetCategory, amount: Money) {
        *self.0.entry(category).or_default() += amount;
    }

    /// Adds every entry of `other`.
    pub fn merge(&mut self, other: &Self) {
        for (category, amount) in other.iter() {
            self.add(category, amount);
        }
    }

    /// Sum over all categories.
    #[must_use]
    pub fn total(&self) -> Money {
        self.0.values().sum()
    }

    /// Total of all categories, `None` if the sum overflows.
    #[must_use]
    pub fn checked_total(&self) -> Option<Money> {
        self.0
            .values()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(*amount))
    }

    /// Iterates entries in category order.
    pub fn iter(&self) -> impl Iterator<Item = (BudgetCategory, Money)> + '_ {
        self.0.iter().map(|(c, m)| (*c, *m))
    }
}

impl FromIterator<(BudgetCategory, Money)> for CategoryAmounts {
    fn from_iter<I: IntoIterator<Item = (BudgetCategory, Money)>>(iter: I) -> Self {
        let mut amounts = Self::new();
        for (category, amount) in iter {
            amounts.add(category, amount);
        }
        amounts
    }
}

impl Serialize for CategoryAmounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(c, m)| (c, m.wan())))
    }
}

impl<'de> Deserialize<'de> for CategoryAmounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<BudgetCategory, Decimal>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(c, v)| Money::from_wan(v).map(|m| (c, m)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Allocation vs. spend for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUsage {
    /// Category.
    pub category: BudgetCategory,
    /// Allocated amount.
    #[serde(with = "wan")]
    pub allocated: Money,
    /// Spent amount.
    #[serde(with = "wan")]
    pub spent: Money,
    /// Allocated minus spent; negative when overspent.
    #[serde(with = "wan")]
    pub remaining: Money,
    /// Spent / allocated in percent.
    pub execution_rate: Decimal,
}

impl CategoryUsage {
    /// Builds a usage line.
    #[must_use]
    pub fn new(category: BudgetCategory, allocated: Money, spent: Money) -> Self {
        Self {
            category,
            allocated,
            spent,
            remaining: allocated - spent,
            execution_rate: execution_rate(spent, allocated),
        }
    }
}

/// A stored total or annual budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning project.
    pub project_id: ProjectId,
    /// `None` for the total budget.
    pub year: Option<i32>,
    /// Category allocations.
    pub allocation: CategoryAmounts,
    /// Sum of the allocations.
    #[serde(with = "wan")]
    pub total_amount: Money,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// True for the project's total budget.
    #[must_use]
    pub const fn is_total(&self) -> bool {
        self.year.is_none()
    }
}

/// Body for setting the total budget or editing an annual one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationInput {
    /// Category allocations in wan.
    pub allocation: CategoryAmounts,
}

/// Body for adding an annual budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualBudgetInput {
    /// Budget year.
    pub year: i32,
    /// Category allocations in wan.
    pub allocation: CategoryAmounts,
}

/// Allocation vs. spend for a whole budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUsage {
    /// Budget the figures belong to, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<BudgetId>,
    /// `None` for the total budget.
    pub year: Option<i32>,
    /// Sum of category allocations.
    #[serde(with = "wan")]
    pub allocated: Money,
    /// Sum of category spend.
    #[serde(with = "wan")]
    pub spent: Money,
    /// Allocated minus spent.
    #[serde(with = "wan")]
    pub remaining: Money,
    /// Spent / allocated in percent.
    pub execution_rate: Decimal,
    /// One line per category, in display order.
    pub lines: Vec<CategoryUsage>,
}

impl BudgetUsage {
    /// Attaches the budget ID.
    #[must_use]
    pub const fn with_budget(mut self, id: BudgetId) -> Self {
        self.budget_id = Some(id);
        self
    }
}

/// Input to the overview: one annual budget with its derived spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnualBudgetSnapshot {
    /// Budget year.
    pub year: i32,
    /// Category allocations.
    pub allocation: CategoryAmounts,
    /// Category spend.
    pub spent: CategoryAmounts,
}

/// Total budget usage plus every annual budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBudgetOverview {
    /// Total budget; spend is the sum over annual budgets.
    pub total: BudgetUsage,
    /// Annual budgets ordered by year.
    pub annual: Vec<BudgetUsage>,
    /// Sum of annual budget totals.
    #[serde(with = "wan")]
    pub allocated_to_years: Money,
    /// Total budget not yet handed out to any year.
    #[serde(with = "wan")]
    pub unallocated: Money,
}
