//! Research records kept alongside the budget: outcomes, documents and
//! academic activities.

pub mod academic;
pub mod document;
pub mod error;
pub mod filter;
pub mod outcome;

pub use academic::{AcademicActivity, AcademicActivityInput, ActivityStatus, ActivityType};
pub use document::{DocumentInput, DocumentType, ProjectDocument};
pub use error::RecordError;
pub use filter::{Filterable, RecordFilter};
pub use outcome::{OutcomeInput, OutcomeStatus, OutcomeType, ProjectOutcome};
