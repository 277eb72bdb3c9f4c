//! Project documents.

use chrono::{DateTime, NaiveDate, Utc};
use fundtrack_shared::types::{DocumentId, ProjectId};
use serde::{Deserialize, Serialize};

use super::error::{RecordError, require_name};
use super::filter::Filterable;
use crate::project::clean_optional;

coded_enum! {
    /// Document kind.
    pub enum DocumentType {
        /// Funding application.
        Application => "application",
        /// Contract or task agreement.
        Contract => "contract",
        /// Raw research data.
        ResearchData => "research_data",
        /// Result report.
        Result => "result",
        /// Meeting minutes.
        Meeting => "meeting",
        /// Anything else.
        Other => "other",
    }
}

/// A document filed under a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Document ID.
    pub id: DocumentId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Title.
    pub name: String,
    /// Kind.
    pub doc_type: DocumentType,
    /// Free-form version label.
    pub version: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Comma-separated keywords.
    pub keywords: Option<String>,
    /// Who filed it.
    pub uploader: Option<String>,
    /// When the file was last uploaded.
    pub upload_time: Option<DateTime<Utc>>,
    /// Storage key of the file.
    pub file_key: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Title.
    pub name: String,
    /// Kind.
    pub doc_type: DocumentType,
    /// Version label.
    #[serde(default)]
    pub version: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Keywords.
    #[serde(default)]
    pub keywords: Option<String>,
    /// Who filed it.
    #[serde(default)]
    pub uploader: Option<String>,
}

impl DocumentInput {
    /// Validates the input and trims its text fields.
    pub fn normalize(self) -> Result<Self, RecordError> {
        Ok(Self {
            name: require_name(&self.name)?,
            doc_type: self.doc_type,
            version: clean_optional(self.version),
            description: clean_optional(self.description),
            keywords: clean_optional(self.keywords),
            uploader: clean_optional(self.uploader),
        })
    }
}

impl Filterable for ProjectDocument {
    fn keyword_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.description.as_deref(),
            self.keywords.as_deref(),
            self.uploader.as_deref(),
        ]
    }

    fn type_code(&self) -> &'static str {
        self.doc_type.as_str()
    }

    fn status_code(&self) -> Option<&'static str> {
        None
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        Some(self.upload_time.unwrap_or(self.created_at).date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordFilter;

    fn document(name: &str, doc_type: DocumentType, keywords: Option<&str>) -> ProjectDocument {
        let now = Utc::now();
        ProjectDocument {
            id: DocumentId::new(),
            project_id: ProjectId::new(),
            name: name.to_string(),
            doc_type,
            version: Some("v1".to_string()),
            description: None,
            keywords: keywords.map(String::from),
            uploader: None,
            upload_time: None,
            file_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_normalize() {
        let input = DocumentInput {
            name: "  Mid-term report ".to_string(),
            doc_type: DocumentType::Result,
            version: Some("   ".to_string()),
            description: None,
            keywords: Some(" soil, nitrogen ".to_string()),
            uploader: None,
        };
        let normalized = input.normalize().unwrap();
        assert_eq!(normalized.name, "Mid-term report");
        assert_eq!(normalized.version, None);
        assert_eq!(normalized.keywords.as_deref(), Some("soil, nitrogen"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let input = DocumentInput {
            name: " ".to_string(),
            doc_type: DocumentType::Other,
            version: None,
            description: None,
            keywords: None,
            uploader: None,
        };
        assert_eq!(input.normalize(), Err(RecordError::EmptyName));
    }

    #[test]
    fn test_status_filter_never_matches_documents() {
        let docs = vec![
            document("Task agreement", DocumentType::Contract, None),
            document("Field notes", DocumentType::ResearchData, Some("nitrogen")),
        ];
        let by_type = RecordFilter {
            kind: Some("research_data".to_string()),
            keyword: Some("NITRO".to_string()),
            ..RecordFilter::default()
        };
        assert_eq!(by_type.apply(docs.clone()).len(), 1);

        let by_status = RecordFilter {
            status: Some("draft".to_string()),
            ..RecordFilter::default()
        };
        assert!(by_status.apply(docs).is_empty());
    }
}
