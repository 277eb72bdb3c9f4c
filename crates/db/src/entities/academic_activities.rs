//! `SeaORM` Entity for academic_activities table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub activity_type: String,
    pub status: String,
    pub organizer: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub location: Option<String>,
    pub participants: Option<String>,
    pub description: Option<String>,
    pub attachment_key: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
