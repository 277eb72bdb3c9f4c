//! Filter primitives shared by expense and record listings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date included.
    pub from: Option<NaiveDate>,
    /// Last date included.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range from optional bounds.
    #[must_use]
    pub const fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// True when neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether `date` falls in the range.
    ///
    /// A record without a date never matches a bounded range.
    #[must_use]
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Case-insensitive substring match over any of `fields`.
///
/// An empty or blank keyword matches everything.
#[must_use]
pub fn keyword_matches(keyword: Option<&str>, fields: &[Option<&str>]) -> bool {
    let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
        return true;
    };
    let needle = keyword.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert!(range.contains(Some(date(2024, 1, 1))));
        assert!(range.contains(Some(date(2024, 1, 31))));
        assert!(!range.contains(Some(date(2024, 2, 1))));
        assert!(!range.contains(None));
    }

    #[test]
    fn test_date_range_open_bounds() {
        let range = DateRange::new(Some(date(2024, 6, 1)), None);
        assert!(range.contains(Some(date(2030, 1, 1))));
        assert!(!range.contains(Some(date(2024, 5, 31))));

        let unbounded = DateRange::default();
        assert!(unbounded.contains(None));
    }

    #[test]
    fn test_keyword_matches() {
        let fields = [Some("Spectrometer"), None, Some("Acme Labs")];
        assert!(keyword_matches(Some("spectro"), &fields));
        assert!(keyword_matches(Some("ACME"), &fields));
        assert!(!keyword_matches(Some("reagent"), &fields));
        assert!(keyword_matches(Some("  "), &fields));
        assert!(keyword_matches(None, &fields));
    }
}
