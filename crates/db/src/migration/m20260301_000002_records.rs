//! Tasks, outcomes, documents and academic activities.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(RECORDS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS academic_activities;
             DROP TABLE IF EXISTS project_documents;
             DROP TABLE IF EXISTS project_outcomes;
             DROP TABLE IF EXISTS project_tasks;",
        )
        .await?;
        Ok(())
    }
}

const RECORDS_SQL: &str = r"
CREATE TABLE project_tasks (
    id BLOB PRIMARY KEY NOT NULL,
    project_id BLOB NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    parent_id BLOB REFERENCES project_tasks(id) ON DELETE CASCADE,
    level INTEGER NOT NULL DEFAULT 0,
    name TEXT NOT NULL,
    description TEXT,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    status TEXT NOT NULL,
    progress INTEGER NOT NULL DEFAULT 0 CHECK (progress BETWEEN 0 AND 100),
    -- JSON array of task IDs
    dependencies TEXT NOT NULL DEFAULT '[]',
    assignee TEXT,
    phase TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    CHECK (end_date >= start_date)
);

CREATE INDEX idx_project_tasks_project ON project_tasks(project_id, start_date);

CREATE TABLE project_outcomes (
    id BLOB PRIMARY KEY NOT NULL,
    project_id BLOB NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    outcome_type TEXT NOT NULL,
    name TEXT NOT NULL,
    status TEXT NOT NULL,
    authors TEXT,
    submit_date TEXT,
    publish_date TEXT,
    journal TEXT,
    description TEXT,
    remarks TEXT,
    attachment_key TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_project_outcomes_project ON project_outcomes(project_id);

CREATE TABLE project_documents (
    id BLOB PRIMARY KEY NOT NULL,
    project_id BLOB NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    doc_type TEXT NOT NULL,
    version TEXT,
    description TEXT,
    keywords TEXT,
    uploader TEXT,
    upload_time TEXT,
    file_key TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_project_documents_project ON project_documents(project_id);

CREATE TABLE academic_activities (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    activity_type TEXT NOT NULL,
    status TEXT NOT NULL,
    organizer TEXT,
    start_date TEXT,
    end_date TEXT,
    location TEXT,
    participants TEXT,
    description TEXT,
    attachment_key TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_academic_activities_start ON academic_activities(start_date);
";
