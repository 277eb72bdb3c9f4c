//! Budget plan types.

use chrono::{DateTime, Utc};
use fundtrack_shared::types::{BudgetPlanId, Money, PlanItemId};
use serde::{Deserialize, Serialize};

use crate::budget::BudgetCategory;

coded_enum! {
    /// Top-level split of a plan.
    pub enum PlanCategory {
        /// Direct costs.
        Direct => "direct",
        /// Indirect costs.
        Indirect => "indirect",
    }
}

coded_enum! {
    /// Line type within a category.
    pub enum PlanSubcategory {
        /// 设备费
        Equipment => "equipment",
        /// 材料费
        Material => "material",
        /// 外协费
        Outsourcing => "outsourcing",
        /// 燃动费
        Fuel => "fuel",
        /// 会议差旅
        Conference => "conference",
        /// 出版文献
        Publication => "publication",
        /// 劳务费
        Labor => "labor",
        /// 专家咨询费
        Consulting => "consulting",
        /// 其他支出
        Miscellaneous => "miscellaneous",
        /// 管理费用
        Management => "management",
        /// 绩效津贴
        Performance => "performance",
    }
}

impl PlanSubcategory {
    /// Category this subcategory belongs to.
    #[must_use]
    pub const fn category(self) -> PlanCategory {
        match self {
            Self::Management | Self::Performance => PlanCategory::Indirect,
            _ => PlanCategory::Direct,
        }
    }

    /// Budget category the line is spent against once funded.
    #[must_use]
    pub const fn budget_category(self) -> BudgetCategory {
        match self {
            Self::Equipment => BudgetCategory::Equipment,
            Self::Material => BudgetCategory::Material,
            Self::Outsourcing => BudgetCategory::Outsourcing,
            Self::Fuel => BudgetCategory::Fuel,
            Self::Conference => BudgetCategory::Conference,
            Self::Publication => BudgetCategory::Publication,
            Self::Labor => BudgetCategory::Labor,
            Self::Consulting => BudgetCategory::Consulting,
            Self::Miscellaneous => BudgetCategory::Miscellaneous,
            Self::Management | Self::Performance => BudgetCategory::Indirect,
        }
    }
}

/// A plan header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPlan {
    /// Plan ID.
    pub id: BudgetPlanId,
    /// Plan name.
    pub name: String,
    /// Remarks.
    pub remarks: Option<String>,
    /// Sum of root item amounts, in wan.
    #[serde(with = "fundtrack_shared::types::money::wan")]
    pub total_amount: Money,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// One stored plan line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    /// Item ID.
    pub id: PlanItemId,
    /// Owning plan.
    pub plan_id: BudgetPlanId,
    /// Parent line.
    pub parent_id: Option<PlanItemId>,
    /// Order among siblings.
    pub position: u32,
    /// Direct or indirect.
    pub category: Option<PlanCategory>,
    /// Line type.
    pub subcategory: Option<PlanSubcategory>,
    /// Line name.
    pub name: String,
    /// Model or short description.
    pub specification: Option<String>,
    /// Unit price in wan.
    #[serde(with = "fundtrack_shared::types::money::wan")]
    pub unit_price: Money,
    /// Quantity.
    pub quantity: u32,
    /// Line amount in wan.
    #[serde(with = "fundtrack_shared::types::money::wan")]
    pub amount: Money,
    /// Remarks.
    pub remarks: Option<String>,
}

/// A plan line as submitted, with its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItemInput {
    /// Direct or indirect.
    #[serde(default)]
    pub category: Option<PlanCategory>,
    /// Line type.
    #[serde(default)]
    pub subcategory: Option<PlanSubcategory>,
    /// Line name.
    pub name: String,
    /// Model or short description.
    #[serde(default)]
    pub specification: Option<String>,
    /// Unit price in wan. Ignored for lines with children.
    #[serde(default, with = "fundtrack_shared::types::money::wan")]
    pub unit_price: Money,
    /// Quantity. Ignored for lines with children.
    #[serde(default)]
    pub quantity: u32,
    /// Remarks.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Child lines.
    #[serde(default)]
    pub children: Vec<PlanItemInput>,
}

/// A plan as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPlanInput {
    /// Plan name.
    pub name: String,
    /// Remarks.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Root lines.
    #[serde(default)]
    pub items: Vec<PlanItemInput>,
}

/// A stored line with its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanNode {
    /// The line.
    #[serde(flatten)]
    pub item: PlanItem,
    /// Child lines in position order.
    pub children: Vec<PlanNode>,
}

/// A plan with its line tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetPlanDetail {
    /// Header.
    #[serde(flatten)]
    pub plan: BudgetPlan,
    /// Root lines in position order.
    pub items: Vec<PlanNode>,
}
