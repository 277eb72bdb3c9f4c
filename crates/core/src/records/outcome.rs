//! Project outcomes: papers, patents, software copyrights and the like.

use chrono::{DateTime, NaiveDate, Utc};
use fundtrack_shared::types::{OutcomeId, ProjectId};
use serde::{Deserialize, Serialize};

use super::error::{RecordError, require_name};
use super::filter::Filterable;
use crate::project::clean_optional;

coded_enum! {
    /// Kind of outcome.
    pub enum OutcomeType {
        /// Journal or conference paper.
        Paper => "paper",
        /// Patent.
        Patent => "patent",
        /// Software copyright.
        Software => "software",
        /// Technical standard.
        Standard => "standard",
        /// Award.
        Award => "award",
        /// Anything else.
        Other => "other",
    }
}

coded_enum! {
    /// Publication / grant status.
    pub enum OutcomeStatus {
        /// Being written.
        Draft => "draft",
        /// Submitted for review or filing.
        Submitted => "submitted",
        /// Accepted.
        Accepted => "accepted",
        /// Published or granted.
        Published => "published",
        /// Rejected.
        Rejected => "rejected",
    }
}

/// A research outcome of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOutcome {
    /// Outcome ID.
    pub id: OutcomeId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Kind.
    pub outcome_type: OutcomeType,
    /// Title.
    pub name: String,
    /// Status.
    pub status: OutcomeStatus,
    /// Author list as entered.
    pub authors: Option<String>,
    /// Submission date.
    pub submit_date: Option<NaiveDate>,
    /// Publication / grant date.
    pub publish_date: Option<NaiveDate>,
    /// Journal, conference or patent office.
    pub journal: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Remarks.
    pub remarks: Option<String>,
    /// Storage key of the attached file.
    pub attachment_key: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeInput {
    /// Kind.
    pub outcome_type: OutcomeType,
    /// Title.
    pub name: String,
    /// Status.
    #[serde(default = "default_status")]
    pub status: OutcomeStatus,
    /// Author list.
    #[serde(default)]
    pub authors: Option<String>,
    /// Submission date.
    #[serde(default)]
    pub submit_date: Option<NaiveDate>,
    /// Publication / grant date.
    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
    /// Journal, conference or patent office.
    #[serde(default)]
    pub journal: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}

fn default_status() -> OutcomeStatus {
    OutcomeStatus::Draft
}

impl OutcomeInput {
    /// Validates the input and trims its text fields.
    pub fn normalize(self) -> Result<Self, RecordError> {
        RecordError::check_order(
            "submit date",
            self.submit_date,
            "publish date",
            self.publish_date,
        )?;
        Ok(Self {
            name: require_name(&self.name)?,
            authors: clean_optional(self.authors),
            journal: clean_optional(self.journal),
            description: clean_optional(self.description),
            remarks: clean_optional(self.remarks),
            ..self
        })
    }
}

impl Filterable for ProjectOutcome {
    fn keyword_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.authors.as_deref(),
            self.journal.as_deref(),
            self.description.as_deref(),
            self.remarks.as_deref(),
        ]
    }

    fn type_code(&self) -> &'static str {
        self.outcome_type.as_str()
    }

    fn status_code(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        self.publish_date.or(self.submit_date)
    }
}
