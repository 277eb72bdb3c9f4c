//! `SeaORM` Entity for budget_plan_items table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_plan_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plan_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub position: i64,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub name: String,
    pub specification: Option<String>,
    pub unit_price_fen: i64,
    pub quantity: i64,
    pub amount_fen: i64,
    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budget_plans::Entity",
        from = "Column::PlanId",
        to = "super::budget_plans::Column::Id",
        on_delete = "Cascade"
    )]
    BudgetPlans,
}

impl Related<super::budget_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
