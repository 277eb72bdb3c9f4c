//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! They return domain types from `fundtrack-core`, never entity models.

pub mod academic;
pub mod activity_log;
pub mod attachment;
pub mod budget;
pub mod document;
pub mod expense;
pub mod export;
pub mod outcome;
pub mod plan;
pub mod project;
pub mod task;

pub use academic::AcademicActivityRepository;
pub use activity_log::ActivityLogRepository;
pub use attachment::AttachmentRepository;
pub use budget::BudgetRepository;
pub use document::DocumentRepository;
pub use expense::ExpenseRepository;
pub use export::ExportRepository;
pub use outcome::OutcomeRepository;
pub use plan::PlanRepository;
pub use project::ProjectRepository;
pub use task::TaskRepository;
