//! API route definitions.

use axum::Router;
use chrono::NaiveDate;
use fundtrack_core::filter::DateRange;
use fundtrack_core::records::RecordFilter;
use serde::Deserialize;

use crate::AppState;

pub mod academic;
pub mod activity;
pub mod attachments;
pub mod budgets;
pub mod documents;
pub mod expenses;
pub mod health;
pub mod outcomes;
pub mod plans;
pub mod projects;
pub mod tasks;
pub mod tools;
pub mod transfer;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(projects::routes())
        .merge(budgets::routes())
        .merge(expenses::routes())
        .merge(tasks::routes())
        .merge(outcomes::routes())
        .merge(documents::routes())
        .merge(academic::routes())
        .merge(plans::routes())
        .merge(activity::routes())
        .merge(tools::routes())
        .merge(transfer::routes())
}

/// Query string shared by the outcome, document and academic activity lists.
#[derive(Debug, Default, Deserialize)]
pub struct RecordQuery {
    /// Case-insensitive substring.
    pub keyword: Option<String>,
    /// Type code.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Status code.
    pub status: Option<String>,
    /// First date included.
    pub from: Option<NaiveDate>,
    /// Last date included.
    pub to: Option<NaiveDate>,
}

impl From<RecordQuery> for RecordFilter {
    fn from(query: RecordQuery) -> Self {
        let blank_to_none = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            keyword: blank_to_none(query.keyword),
            kind: blank_to_none(query.kind),
            status: blank_to_none(query.status),
            dates: DateRange::new(query.from, query.to),
        }
    }
}
