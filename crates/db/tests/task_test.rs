//! Integration tests for project tasks.

mod common;

use common::{OPERATOR, create_project, date, setup};
use fundtrack_core::progress::{ProgressError, TaskInput, TaskStatus};
use fundtrack_db::{RepositoryError, TaskRepository};
use fundtrack_shared::types::{ProjectId, TaskId};

fn task(name: &str, parent: Option<TaskId>, start: (u32, u32), end: (u32, u32)) -> TaskInput {
    TaskInput {
        parent_id: parent,
        name: name.to_string(),
        description: None,
        start_date: date(2024, start.0, start.1),
        end_date: date(2024, end.0, end.1),
        status: TaskStatus::InProgress,
        progress: 0,
        dependencies: vec![],
        assignee: None,
        phase: None,
    }
}

async fn create(repo: &TaskRepository, project: ProjectId, input: TaskInput) -> TaskId {
    repo.create(project, input, OPERATOR).await.unwrap().id
}

#[tokio::test]
async fn test_levels_follow_parents() {
    let db = setup().await;
    let project = create_project(&db, "Levels").await;
    let repo = TaskRepository::new(db.clone());

    let phase = create(&repo, project.id, task("Phase 1", None, (1, 1), (6, 30))).await;
    let survey = create(&repo, project.id, task("Survey", Some(phase), (1, 1), (2, 28))).await;
    let sampling = create(&repo, project.id, task("Sampling", Some(survey), (1, 15), (2, 1))).await;
    assert_eq!(repo.get(sampling).await.unwrap().level, 2);

    // Moving the survey to the top re-levels its subtree.
    repo.update(survey, task("Survey", None, (1, 1), (2, 28)), OPERATOR)
        .await
        .unwrap();
    assert_eq!(repo.get(survey).await.unwrap().level, 0);
    assert_eq!(repo.get(sampling).await.unwrap().level, 1);

    let tree = repo.tree(project.id).await.unwrap();
    let roots: Vec<&str> = tree.iter().map(|n| n.task.name.as_str()).collect();
    assert_eq!(roots, vec!["Phase 1", "Survey"]);
    assert_eq!(tree[1].children[0].task.id, sampling);
}

#[tokio::test]
async fn test_parent_cycle_rejected() {
    let db = setup().await;
    let project = create_project(&db, "Parent cycle").await;
    let repo = TaskRepository::new(db.clone());

    let parent = create(&repo, project.id, task("Parent", None, (1, 1), (3, 1))).await;
    let child = create(&repo, project.id, task("Child", Some(parent), (1, 1), (2, 1))).await;

    let result = repo
        .update(parent, task("Parent", Some(child), (1, 1), (3, 1)), OPERATOR)
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::Progress(ProgressError::ParentCycle(_)))
    ));
}

#[tokio::test]
async fn test_dependency_rules() {
    let db = setup().await;
    let project = create_project(&db, "Dependencies").await;
    let repo = TaskRepository::new(db.clone());

    let design = create(&repo, project.id, task("Design", None, (1, 1), (1, 31))).await;
    let mut build = task("Build", None, (2, 1), (3, 31));
    build.dependencies = vec![design];
    let build = create(&repo, project.id, build).await;

    let mut cyclic = task("Design", None, (1, 1), (1, 31));
    cyclic.dependencies = vec![build];
    let result = repo.update(design, cyclic, OPERATOR).await;
    assert!(matches!(
        result,
        Err(RepositoryError::Progress(ProgressError::DependencyCycle(_)))
    ));

    let mut own = task("Design", None, (1, 1), (1, 31));
    own.dependencies = vec![design];
    let result = repo.update(design, own, OPERATOR).await;
    assert!(matches!(
        result,
        Err(RepositoryError::Progress(ProgressError::SelfDependency))
    ));

    let mut stray = task("Test", None, (4, 1), (4, 30));
    stray.dependencies = vec![TaskId::new()];
    let result = repo.create(project.id, stray, OPERATOR).await;
    assert!(matches!(
        result,
        Err(RepositoryError::Progress(ProgressError::UnknownTask(_)))
    ));
}

#[tokio::test]
async fn test_delete_removes_subtree_and_dependencies() {
    let db = setup().await;
    let project = create_project(&db, "Delete tasks").await;
    let repo = TaskRepository::new(db.clone());

    let phase = create(&repo, project.id, task("Phase", None, (1, 1), (3, 31))).await;
    let step = create(&repo, project.id, task("Step", Some(phase), (1, 1), (1, 31))).await;
    let mut report = task("Report", None, (4, 1), (4, 30));
    report.dependencies = vec![phase, step];
    let report = create(&repo, project.id, report).await;

    repo.delete(phase, OPERATOR).await.unwrap();

    let remaining = repo.list(project.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, report);
    assert!(remaining[0].dependencies.is_empty());
    assert!(repo.get(step).await.is_err());
}

#[tokio::test]
async fn test_gantt_reports_delays() {
    let db = setup().await;
    let project = create_project(&db, "Gantt").await;
    let repo = TaskRepository::new(db.clone());

    create(&repo, project.id, task("Late", None, (1, 1), (1, 31))).await;
    let mut done = task("Done", None, (2, 1), (2, 10));
    done.progress = 100;
    create(&repo, project.id, done).await;

    let chart = repo.gantt(project.id, date(2024, 3, 1)).await.unwrap();
    assert_eq!(chart.start, Some(date(2024, 1, 1)));
    assert_eq!(chart.rows[0].status, TaskStatus::Delayed);
    assert_eq!(chart.rows[1].status, TaskStatus::Completed);
    assert_eq!(chart.rows[1].start_offset_days, 31);
}
