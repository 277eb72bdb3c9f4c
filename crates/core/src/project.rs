//! Research project records.

use chrono::{DateTime, NaiveDate, Utc};
use fundtrack_shared::AppError;
use fundtrack_shared::types::money::wan;
use fundtrack_shared::types::{Money, ProjectId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A research project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Code assigned by the finance office.
    pub financial_code: Option<String>,
    /// Code assigned by the funding agency.
    pub project_code: Option<String>,
    /// Free-form programme / project type.
    pub project_type: Option<String>,
    /// Principal investigator.
    pub leader: Option<String>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
    /// Allocation of the total budget, kept in step with it.
    #[serde(with = "wan")]
    pub total_budget: Money,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInput {
    /// Project name.
    pub name: String,
    /// Code assigned by the finance office.
    #[serde(default)]
    pub financial_code: Option<String>,
    /// Code assigned by the funding agency.
    #[serde(default)]
    pub project_code: Option<String>,
    /// Programme / project type.
    #[serde(default)]
    pub project_type: Option<String>,
    /// Principal investigator.
    #[serde(default)]
    pub leader: Option<String>,
    /// Start date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// End date.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// List row: a project with the execution of its total budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// The project.
    #[serde(flatten)]
    pub project: Project,
    /// Total budget allocation.
    #[serde(with = "wan")]
    pub budget_allocated: Money,
    /// Spend across all annual budgets.
    #[serde(with = "wan")]
    pub budget_spent: Money,
    /// Spent / allocated in percent.
    pub execution_rate: Decimal,
}

/// Project validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    /// Name is required.
    #[error("project name is required")]
    EmptyName,

    /// End date before start date.
    #[error("end date {end} is before start date {start}")]
    DateOrder {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Project rules.
pub struct ProjectService;

impl ProjectService {
    /// Validates and normalises a project input.
    ///
    /// Blank optional strings become `None`; the name is trimmed.
    pub fn normalize(mut input: ProjectInput) -> Result<ProjectInput, ProjectError> {
        input.name = input.name.trim().to_string();
        if input.name.is_empty() {
            return Err(ProjectError::EmptyName);
        }
        for field in [
            &mut input.financial_code,
            &mut input.project_code,
            &mut input.project_type,
            &mut input.leader,
        ] {
            *field = clean_optional(field.take());
        }
        if let (Some(start), Some(end)) = (input.start_date, input.end_date)
            && end < start
        {
            return Err(ProjectError::DateOrder { start, end });
        }
        Ok(input)
    }
}

/// Trims a free-text field, mapping blank input to `None`.
#[must_use]
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
