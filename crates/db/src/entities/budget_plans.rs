//! `SeaORM` Entity for budget_plans table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub remarks: Option<String>,
    pub total_amount_fen: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::budget_plan_items::Entity")]
    BudgetPlanItems,
}

impl Related<super::budget_plan_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetPlanItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
