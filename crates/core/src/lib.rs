//! Core business logic for Fundtrack.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `project` - Research project records
//! - `budget` - Total / annual budgets, category allocations and execution rates
//! - `expense` - Expense records, filtering, statistics and CSV batch import
//! - `indirect` - Maximum indirect cost under a tiered marginal-rate schedule
//! - `progress` - Project task hierarchy, dependencies and the Gantt view
//! - `records` - Outcomes, documents and academic activities
//! - `plan` - Budget preparation trees
//! - `audit` - Activity log entries
//! - `storage` / `attachment` - Attachment files on OpenDAL
//! - `export` - JSON project bundles and Excel workbooks

#[macro_use]
mod code;

pub mod attachment;
pub mod audit;
pub mod budget;
pub mod expense;
pub mod export;
pub mod filter;
pub mod indirect;
pub mod plan;
pub mod progress;
pub mod project;
pub mod records;
pub mod storage;
