//! `SeaORM` Entity for activity_logs table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub budget_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
    pub entity: String,
    pub action: String,
    pub description: String,
    pub operator: String,
    pub old_data: Option<String>,
    pub new_data: Option<String>,
    pub category: Option<String>,
    pub amount_fen: Option<i64>,
    pub related_info: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
