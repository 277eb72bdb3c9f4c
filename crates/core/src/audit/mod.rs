//! Activity log: who changed what, and the before/after state.

mod types;

pub use types::{ActionKind, ActivityEntry, ActivityFilter, ActivityRecord, EntityKind};
