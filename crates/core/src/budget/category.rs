//! Expense categories used for budget lines and expenses.

use serde::{Deserialize, Serialize};

/// One of the ten funding categories of a research budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    /// Equipment purchase (设备费).
    Equipment,
    /// Materials (材料费).
    Material,
    /// Outsourced testing and processing (外协费).
    Outsourcing,
    /// Fuel and power (燃动费).
    Fuel,
    /// Conferences and travel (会议差旅).
    Conference,
    /// Publications and literature (出版文献).
    Publication,
    /// Labour (劳务费).
    Labor,
    /// Expert consulting (专家咨询费).
    Consulting,
    /// Other expenses (其他支出).
    Miscellaneous,
    /// Indirect costs (间接费).
    Indirect,
}

impl BudgetCategory {
    /// Every category in display order.
    pub const ALL: [Self; 10] = [
        Self::Equipment,
        Self::Material,
        Self::Outsourcing,
        Self::Fuel,
        Self::Conference,
        Self::Publication,
        Self::Labor,
        Self::Consulting,
        Self::Miscellaneous,
        Self::Indirect,
    ];

    /// Convert to database string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Material => "material",
            Self::Outsourcing => "outsourcing",
            Self::Fuel => "fuel",
            Self::Conference => "conference",
            Self::Publication => "publication",
            Self::Labor => "labor",
            Self::Consulting => "consulting",
            Self::Miscellaneous => "miscellaneous",
            Self::Indirect => "indirect",
        }
    }

    /// Chinese label as printed on reimbursement forms and spreadsheets.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Equipment => "设备费",
            Self::Material => "材料费",
            Self::Outsourcing => "外协费",
            Self::Fuel => "燃动费",
            Self::Conference => "会议差旅",
            Self::Publication => "出版文献",
            Self::Labor => "劳务费",
            Self::Consulting => "专家咨询费",
            Self::Miscellaneous => "其他支出",
            Self::Indirect => "间接费",
        }
    }

    /// Parse a code (any case) or a Chinese label.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.label() == s)
    }

    /// Categories that count as direct cost.
    pub fn direct() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|c| *c != Self::Indirect)
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
