//! `SeaORM` entity definitions.
//!
//! IDs are UUID v7 blobs, money is fen in `i64`, coded enums are `TEXT`.

pub mod academic_activities;
pub mod activity_logs;
pub mod budget_items;
pub mod budget_plan_items;
pub mod budget_plans;
pub mod budgets;
pub mod expenses;
pub mod project_documents;
pub mod project_outcomes;
pub mod project_tasks;
pub mod projects;
