//! Budget plan repository.
//!
//! A plan's lines are rewritten as a whole on every save; amounts are
//! computed by [`PlanService::roll_up`] before anything is stored.

use chrono::Utc;
use fundtrack_core::plan::{
    BudgetPlan, BudgetPlanDetail, BudgetPlanInput, PlanCategory, PlanItem, PlanService,
    PlanSubcategory,
};
use fundtrack_core::project::clean_optional;
use fundtrack_shared::types::{BudgetPlanId, Money, PlanItemId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::codec::{decode, narrow};
use crate::entities::{budget_plan_items, budget_plans};
use crate::error::RepositoryError;

/// Budget plan repository.
#[derive(Debug, Clone)]
pub struct PlanRepository {
    db: DatabaseConnection,
}

impl PlanRepository {
    /// Creates a new plan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Plans without their lines, newest first.
    pub async fn list(&self) -> Result<Vec<BudgetPlan>, RepositoryError> {
        let models = budget_plans::Entity::find()
            .order_by_desc(budget_plans::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(into_plan).collect())
    }

    /// A plan with its line tree.
    pub async fn get(&self, id: BudgetPlanId) -> Result<BudgetPlanDetail, RepositoryError> {
        let plan = load_plan(&self.db, id).await?;
        detail(&self.db, plan).await
    }

    /// Creates a plan from a line tree.
    pub async fn create(
        &self,
        input: BudgetPlanInput,
    ) -> Result<BudgetPlanDetail, RepositoryError> {
        let name = PlanService::validate_name(&input.name)?;
        let id = BudgetPlanId::new();
        let rolled = PlanService::roll_up(id, &input.items)?;

        let txn = self.db.begin().await?;
        let now = Utc::now();
        let plan = budget_plans::ActiveModel {
            id: Set(id.into_inner()),
            name: Set(name),
            remarks: Set(clean_optional(input.remarks)),
            total_amount_fen: Set(rolled.total.fen()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        insert_items(&txn, &rolled.items).await?;
        let result = detail(&txn, plan).await?;
        txn.commit().await?;

        tracing::info!(plan_id = %id, total = %rolled.total.wan(), "budget plan created");
        Ok(result)
    }

    /// Replaces a plan's name, remarks and lines.
    pub async fn update(
        &self,
        id: BudgetPlanId,
        input: BudgetPlanInput,
    ) -> Result<BudgetPlanDetail, RepositoryError> {
        let name = PlanService::validate_name(&input.name)?;
        let rolled = PlanService::roll_up(id, &input.items)?;

        let txn = self.db.begin().await?;
        let plan = load_plan(&txn, id).await?;
        budget_plan_items::Entity::delete_many()
            .filter(budget_plan_items::Column::PlanId.eq(plan.id))
            .exec(&txn)
            .await?;
        insert_items(&txn, &rolled.items).await?;

        let mut active: budget_plans::ActiveModel = plan.into();
        active.name = Set(name);
        active.remarks = Set(clean_optional(input.remarks));
        active.total_amount_fen = Set(rolled.total.fen());
        active.updated_at = Set(Utc::now());
        let plan = active.update(&txn).await?;
        let result = detail(&txn, plan).await?;
        txn.commit().await?;
        Ok(result)
    }

    /// Deletes a plan and its lines.
    pub async fn delete(&self, id: BudgetPlanId) -> Result<(), RepositoryError> {
        let result = budget_plans::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("budget plan", id.into_inner()));
        }
        Ok(())
    }
}

async fn load_plan<C: ConnectionTrait>(
    conn: &C,
    id: BudgetPlanId,
) -> Result<budget_plans::Model, RepositoryError> {
    budget_plans::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("budget plan", id.into_inner()))
}

async fn detail<C: ConnectionTrait>(
    conn: &C,
    plan: budget_plans::Model,
) -> Result<BudgetPlanDetail, RepositoryError> {
    let models = budget_plan_items::Entity::find()
        .filter(budget_plan_items::Column::PlanId.eq(plan.id))
        .order_by_asc(budget_plan_items::Column::Position)
        .all(conn)
        .await?;
    let items = models
        .into_iter()
        .map(into_item)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BudgetPlanDetail {
        plan: into_plan(plan),
        items: PlanService::build_tree(&items),
    })
}

async fn insert_items<C: ConnectionTrait>(conn: &C, items: &[PlanItem]) -> Result<(), DbErr> {
    if items.is_empty() {
        return Ok(());
    }
    let rows = items.iter().map(|item| budget_plan_items::ActiveModel {
        id: Set(item.id.into_inner()),
        plan_id: Set(item.plan_id.into_inner()),
        parent_id: Set(item.parent_id.map(PlanItemId::into_inner)),
        position: Set(i64::from(item.position)),
        category: Set(item.category.map(|c| c.as_str().to_string())),
        subcategory: Set(item.subcategory.map(|s| s.as_str().to_string())),
        name: Set(item.name.clone()),
        specification: Set(item.specification.clone()),
        unit_price_fen: Set(item.unit_price.fen()),
        quantity: Set(i64::from(item.quantity)),
        amount_fen: Set(item.amount.fen()),
        remarks: Set(item.remarks.clone()),
    });
    // Parents precede their children, which keeps the self reference valid.
    budget_plan_items::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

fn into_plan(model: budget_plans::Model) -> BudgetPlan {
    BudgetPlan {
        id: BudgetPlanId::from_uuid(model.id),
        name: model.name,
        remarks: model.remarks,
        total_amount: Money::from_fen(model.total_amount_fen),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn into_item(model: budget_plan_items::Model) -> Result<PlanItem, DbErr> {
    Ok(PlanItem {
        id: PlanItemId::from_uuid(model.id),
        plan_id: BudgetPlanId::from_uuid(model.plan_id),
        parent_id: model.parent_id.map(PlanItemId::from_uuid),
        position: narrow("position", model.position)?,
        category: model
            .category
            .as_deref()
            .map(|c| decode("category", c, PlanCategory::parse))
            .transpose()?,
        subcategory: model
            .subcategory
            .as_deref()
            .map(|s| decode("subcategory", s, PlanSubcategory::parse))
            .transpose()?,
        name: model.name,
        specification: model.specification,
        unit_price: Money::from_fen(model.unit_price_fen),
        quantity: narrow("quantity", model.quantity)?,
        amount: Money::from_fen(model.amount_fen),
        remarks: model.remarks,
    })
}
