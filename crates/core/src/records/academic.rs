//! Academic activities: conferences, lectures, training and exchanges.
//!
//! These are not tied to a project.

use chrono::{DateTime, NaiveDate, Utc};
use fundtrack_shared::types::AcademicActivityId;
use serde::{Deserialize, Serialize};

use super::error::{RecordError, require_name};
use super::filter::Filterable;
use crate::project::clean_optional;

coded_enum! {
    /// Kind of activity.
    pub enum ActivityType {
        /// Conference.
        Conference => "conference",
        /// Invited lecture.
        Lecture => "lecture",
        /// Training course.
        Training => "training",
        /// Seminar.
        Seminar => "seminar",
        /// Workshop.
        Workshop => "workshop",
        /// Academic exchange or visit.
        Exchange => "exchange",
        /// Anything else.
        Other => "other",
    }
}

coded_enum! {
    /// Activity state.
    pub enum ActivityStatus {
        /// Scheduled.
        Planned => "planned",
        /// Taking place.
        Ongoing => "ongoing",
        /// Finished.
        Completed => "completed",
        /// Called off.
        Cancelled => "cancelled",
    }
}

/// An academic activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicActivity {
    /// Activity ID.
    pub id: AcademicActivityId,
    /// Title.
    pub name: String,
    /// Kind.
    pub activity_type: ActivityType,
    /// State.
    pub status: ActivityStatus,
    /// Organising body.
    pub organizer: Option<String>,
    /// First day.
    pub start_date: Option<NaiveDate>,
    /// Last day.
    pub end_date: Option<NaiveDate>,
    /// Venue.
    pub location: Option<String>,
    /// Participants as entered.
    pub participants: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Storage key of the attached file.
    pub attachment_key: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicActivityInput {
    /// Title.
    pub name: String,
    /// Kind.
    pub activity_type: ActivityType,
    /// State.
    #[serde(default = "default_status")]
    pub status: ActivityStatus,
    /// Organising body.
    #[serde(default)]
    pub organizer: Option<String>,
    /// First day.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Venue.
    #[serde(default)]
    pub location: Option<String>,
    /// Participants.
    #[serde(default)]
    pub participants: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_status() -> ActivityStatus {
    ActivityStatus::Planned
}

impl AcademicActivityInput {
    /// Validates the input and trims its text fields.
    pub fn normalize(self) -> Result<Self, RecordError> {
        RecordError::check_order("start date", self.start_date, "end date", self.end_date)?;
        Ok(Self {
            name: require_name(&self.name)?,
            organizer: clean_optional(self.organizer),
            location: clean_optional(self.location),
            participants: clean_optional(self.participants),
            description: clean_optional(self.description),
            ..self
        })
    }
}

impl Filterable for AcademicActivity {
    fn keyword_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.organizer.as_deref(),
            self.location.as_deref(),
            self.participants.as_deref(),
            self.description.as_deref(),
        ]
    }

    fn type_code(&self) -> &'static str {
        self.activity_type.as_str()
    }

    fn status_code(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        self.start_date
    }
}
