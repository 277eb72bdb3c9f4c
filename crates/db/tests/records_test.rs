//! Integration tests for outcomes, documents and academic activities.

mod common;

use common::{OPERATOR, create_project, date, setup};
use fundtrack_core::audit::{ActionKind, ActivityFilter, EntityKind};
use fundtrack_core::records::{
    AcademicActivityInput, ActivityStatus, ActivityType, DocumentInput, DocumentType, OutcomeInput,
    OutcomeStatus, OutcomeType, RecordError, RecordFilter,
};
use fundtrack_db::{
    AcademicActivityRepository, ActivityLogRepository, DocumentRepository, OutcomeRepository,
    RepositoryError,
};
use fundtrack_shared::types::PageRequest;

fn outcome(kind: OutcomeType, name: &str, status: OutcomeStatus) -> OutcomeInput {
    OutcomeInput {
        outcome_type: kind,
        name: name.to_string(),
        status,
        authors: Some("Lin, Wu".to_string()),
        submit_date: Some(date(2024, 5, 1)),
        publish_date: None,
        journal: None,
        description: None,
        remarks: None,
    }
}

#[tokio::test]
async fn test_outcomes_crud_and_filter() {
    let db = setup().await;
    let project = create_project(&db, "Outcomes").await;
    let repo = OutcomeRepository::new(db.clone());

    let paper = repo
        .create(
            project.id,
            outcome(OutcomeType::Paper, "Carbon flux in peatlands", OutcomeStatus::Submitted),
            OPERATOR,
        )
        .await
        .unwrap();
    repo.create(
        project.id,
        outcome(OutcomeType::Patent, "Flux chamber", OutcomeStatus::Draft),
        OPERATOR,
    )
    .await
    .unwrap();

    let filter = RecordFilter {
        kind: Some("patent".to_string()),
        ..Default::default()
    };
    let patents = repo.list(project.id, &filter).await.unwrap();
    assert_eq!(patents.len(), 1);
    assert_eq!(patents[0].name, "Flux chamber");

    let updated = repo
        .update(
            paper.id,
            outcome(OutcomeType::Paper, "Carbon flux in peatlands", OutcomeStatus::Published),
            OPERATOR,
        )
        .await
        .unwrap();
    assert_eq!(updated.status, OutcomeStatus::Published);

    repo.set_attachment(paper.id, Some("outcomes/paper.pdf".to_string()), OPERATOR)
        .await
        .unwrap();
    let key = repo.delete(paper.id, OPERATOR).await.unwrap();
    assert_eq!(key.as_deref(), Some("outcomes/paper.pdf"));
    assert!(matches!(repo.get(paper.id).await, Err(RepositoryError::NotFound { .. })));
}

#[tokio::test]
async fn test_outcome_requires_name() {
    let db = setup().await;
    let project = create_project(&db, "Nameless").await;
    let result = OutcomeRepository::new(db.clone())
        .create(project.id, outcome(OutcomeType::Other, "  ", OutcomeStatus::Draft), OPERATOR)
        .await;
    assert!(matches!(result, Err(RepositoryError::Record(RecordError::EmptyName))));
}

#[tokio::test]
async fn test_document_file_sets_upload_time() {
    let db = setup().await;
    let project = create_project(&db, "Documents").await;
    let repo = DocumentRepository::new(db.clone());

    let doc = repo
        .create(
            project.id,
            DocumentInput {
                name: "Signed contract".to_string(),
                doc_type: DocumentType::Contract,
                version: Some("v2".to_string()),
                description: None,
                keywords: None,
                uploader: Some("Dr. Lin".to_string()),
            },
            OPERATOR,
        )
        .await
        .unwrap();
    assert!(doc.upload_time.is_none());

    repo.set_file(doc.id, Some("documents/contract.pdf".to_string()), OPERATOR)
        .await
        .unwrap();
    let stored = repo.get(doc.id).await.unwrap();
    assert_eq!(stored.file_key.as_deref(), Some("documents/contract.pdf"));
    assert!(stored.upload_time.is_some());

    repo.set_file(doc.id, None, OPERATOR).await.unwrap();
    assert!(repo.get(doc.id).await.unwrap().upload_time.is_none());

    let filter = ActivityFilter {
        entity: Some(EntityKind::Document),
        action: Some(ActionKind::Update),
        ..Default::default()
    };
    let logged = ActivityLogRepository::new(db.clone())
        .list(&filter, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(logged.meta.total, 2);
    assert_eq!(
        logged.data[0].entry.description,
        "removed file from document 'Signed contract'"
    );
}

#[tokio::test]
async fn test_academic_activities_are_global() {
    let db = setup().await;
    let repo = AcademicActivityRepository::new(db.clone());

    let input = |name: &str, kind, start| AcademicActivityInput {
        name: name.to_string(),
        activity_type: kind,
        status: ActivityStatus::Planned,
        organizer: None,
        start_date: Some(start),
        end_date: None,
        location: Some("Hangzhou".to_string()),
        participants: None,
        description: None,
    };
    repo.create(input("Spring seminar", ActivityType::Seminar, date(2024, 4, 1)))
        .await
        .unwrap();
    let workshop = repo
        .create(input("Field workshop", ActivityType::Workshop, date(2024, 9, 1)))
        .await
        .unwrap();

    let all = repo.list(&RecordFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, workshop.id);

    let filter = RecordFilter {
        keyword: Some("seminar".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.list(&filter).await.unwrap().len(), 1);

    assert_eq!(repo.delete(workshop.id).await.unwrap(), None);
    assert_eq!(repo.list(&RecordFilter::default()).await.unwrap().len(), 1);
}
