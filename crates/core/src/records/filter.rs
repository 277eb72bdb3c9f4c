//! Keyword / type / status / date filtering for record lists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::filter::{DateRange, keyword_matches};

/// Implemented by every record kind that can be listed with a filter.
pub trait Filterable {
    /// Text fields searched by keyword.
    fn keyword_fields(&self) -> Vec<Option<&str>>;
    /// Type code.
    fn type_code(&self) -> &'static str;
    /// Status code, for records that have one.
    fn status_code(&self) -> Option<&'static str>;
    /// Date compared against the range.
    fn filter_date(&self) -> Option<NaiveDate>;
}

/// Criteria for narrowing a record list. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Case-insensitive substring.
    pub keyword: Option<String>,
    /// Type code.
    pub kind: Option<String>,
    /// Status code.
    pub status: Option<String>,
    /// Inclusive date range.
    pub dates: DateRange,
}

impl RecordFilter {
    /// Whether `record` satisfies every criterion.
    pub fn matches<R: Filterable>(&self, record: &R) -> bool {
        let kind_ok = self
            .kind
            .as_deref()
            .is_none_or(|k| k.eq_ignore_ascii_case(record.type_code()));
        let status_ok = self
            .status
            .as_deref()
            .is_none_or(|s| record.status_code().is_some_and(|c| c.eq_ignore_ascii_case(s)));

        kind_ok
            && status_ok
            && keyword_matches(self.keyword.as_deref(), &record.keyword_fields())
            && self.dates.contains(record.filter_date())
    }

    /// Keeps only matching records.
    pub fn apply<R: Filterable>(&self, records: Vec<R>) -> Vec<R> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
