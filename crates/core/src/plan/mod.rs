//! Budget preparation: itemised plans drawn up before funds are granted.

mod error;
mod service;
mod types;

pub use error::PlanError;
pub use service::{PlanService, RolledUpPlan};
pub use types::{
    BudgetPlan, BudgetPlanDetail, BudgetPlanInput, PlanCategory, PlanItem, PlanItemInput,
    PlanNode, PlanSubcategory,
};
