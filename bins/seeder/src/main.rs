//! Demo data seeder for Fundtrack development.
//!
//! Creates one funded project with an annual budget, expenses, tasks and an
//! outcome, plus an academic activity and a budget plan. Running it again
//! leaves an existing demo project alone.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm_migration::MigratorTrait;

use fundtrack_core::budget::{AllocationInput, AnnualBudgetInput, BudgetCategory, CategoryAmounts};
use fundtrack_core::expense::ExpenseInput;
use fundtrack_core::plan::{BudgetPlanInput, PlanItemInput};
use fundtrack_core::progress::{TaskInput, TaskStatus};
use fundtrack_core::project::{Project, ProjectInput};
use fundtrack_core::records::{
    AcademicActivityInput, ActivityStatus, ActivityType, OutcomeInput, OutcomeStatus, OutcomeType,
};
use fundtrack_db::{
    AcademicActivityRepository, BudgetRepository, ExpenseRepository, Migrator, OutcomeRepository,
    PlanRepository, ProjectRepository, TaskRepository,
};
use fundtrack_shared::AppConfig;
use fundtrack_shared::types::{Money, ProjectId};
use sea_orm::DatabaseConnection;

const DEMO_CODE: &str = "DEMO-2024-001";
const OPERATOR: &str = "seeder";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = fundtrack_db::connect(&config.database).await?;
    Migrator::up(&db, None).await?;

    let projects = ProjectRepository::new(db.clone());
    if projects.find_by_code(DEMO_CODE).await?.is_some() {
        println!("  Demo project already exists, skipping...");
        return Ok(());
    }

    println!("Seeding demo project...");
    let project = seed_project(&db).await?;

    println!("Seeding budgets and expenses...");
    seed_budgets(&db, project.id).await?;

    println!("Seeding tasks...");
    seed_tasks(&db, project.id).await?;

    println!("Seeding records...");
    seed_records(&db, project.id).await?;

    println!("Seeding budget plan...");
    seed_plan(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {y}-{m}-{d}"))
}

fn wan(amount: i64) -> anyhow::Result<Money> {
    Ok(Money::from_wan(Decimal::from(amount))?)
}

fn allocation(lines: &[(BudgetCategory, i64)]) -> anyhow::Result<CategoryAmounts> {
    let mut amounts = CategoryAmounts::new();
    for (category, amount) in lines {
        amounts.set(*category, wan(*amount)?);
    }
    Ok(amounts)
}

async fn seed_project(db: &DatabaseConnection) -> anyhow::Result<Project> {
    let input = ProjectInput {
        name: "Soil microbiome response to warming".to_string(),
        financial_code: Some("CW-2024-118".to_string()),
        project_code: Some(DEMO_CODE.to_string()),
        project_type: Some("General programme".to_string()),
        leader: Some("Dr. Lin".to_string()),
        start_date: Some(date(2024, 1, 1)?),
        end_date: Some(date(2026, 12, 31)?),
    };
    let project = ProjectRepository::new(db.clone()).create(input, OPERATOR).await?;
    println!("  Created project: {}", project.name);
    Ok(project)
}

async fn seed_budgets(db: &DatabaseConnection, project_id: ProjectId) -> anyhow::Result<()> {
    let budgets = BudgetRepository::new(db.clone());
    budgets
        .update_total(
            project_id,
            &AllocationInput {
                allocation: allocation(&[
                    (BudgetCategory::Equipment, 30),
                    (BudgetCategory::Material, 20),
                    (BudgetCategory::Conference, 8),
                    (BudgetCategory::Labor, 12),
                    (BudgetCategory::Indirect, 10),
                ])?,
            },
            OPERATOR,
        )
        .await?;

    let annual = budgets
        .create_annual(
            project_id,
            &AnnualBudgetInput {
                year: 2024,
                allocation: allocation(&[
                    (BudgetCategory::Equipment, 20),
                    (BudgetCategory::Material, 8),
                    (BudgetCategory::Conference, 3),
                    (BudgetCategory::Labor, 4),
                ])?,
            },
            OPERATOR,
        )
        .await?;
    println!("  Created annual budget 2024");

    let rows = [
        (BudgetCategory::Equipment, "Benchtop centrifuge", "Eppendorf 5425", 1_850_000, (3, 12)),
        (BudgetCategory::Material, "PCR reagents", "500 reactions", 326_000, (4, 2)),
        (BudgetCategory::Material, "Soil sampling kits", "", 89_050, (4, 18)),
        (BudgetCategory::Conference, "Annual soil ecology meeting", "", 412_000, (6, 7)),
        (BudgetCategory::Labor, "Field assistants, spring campaign", "", 960_000, (6, 30)),
    ];
    let mut expenses = Vec::with_capacity(rows.len());
    for (category, content, specification, fen, (month, day)) in rows {
        expenses.push(ExpenseInput {
            category,
            content: content.to_string(),
            specification: Some(specification.to_string()),
            supplier: None,
            amount: Money::from_fen(fen),
            expense_date: date(2024, month, day)?,
            remarks: None,
        });
    }
    let created = ExpenseRepository::new(db.clone())
        .import_batch(annual.id, expenses, OPERATOR)
        .await?;
    println!("  Created {} expenses", created.len());
    Ok(())
}

async fn seed_tasks(db: &DatabaseConnection, project_id: ProjectId) -> anyhow::Result<()> {
    let tasks = TaskRepository::new(db.clone());
    let task = |name: &str, start: NaiveDate, end: NaiveDate, progress: u8| TaskInput {
        parent_id: None,
        name: name.to_string(),
        description: None,
        start_date: start,
        end_date: end,
        status: if progress > 0 {
            TaskStatus::InProgress
        } else {
            TaskStatus::NotStarted
        },
        progress,
        dependencies: vec![],
        assignee: Some("Dr. Lin".to_string()),
        phase: None,
    };

    let field = tasks
        .create(
            project_id,
            task("Field campaign", date(2024, 3, 1)?, date(2024, 10, 31)?, 60),
            OPERATOR,
        )
        .await?;
    let sampling = tasks
        .create(
            project_id,
            TaskInput {
                parent_id: Some(field.id),
                ..task("Spring sampling", date(2024, 3, 1)?, date(2024, 5, 31)?, 100)
            },
            OPERATOR,
        )
        .await?;
    tasks
        .create(
            project_id,
            TaskInput {
                parent_id: Some(field.id),
                dependencies: vec![sampling.id],
                ..task("Sequencing", date(2024, 6, 1)?, date(2024, 10, 31)?, 30)
            },
            OPERATOR,
        )
        .await?;
    println!("  Created 3 tasks");
    Ok(())
}

async fn seed_records(db: &DatabaseConnection, project_id: ProjectId) -> anyhow::Result<()> {
    OutcomeRepository::new(db.clone())
        .create(
            project_id,
            OutcomeInput {
                outcome_type: OutcomeType::Paper,
                name: "Warming shifts nitrogen-cycling taxa in alpine soils".to_string(),
                status: OutcomeStatus::Submitted,
                authors: Some("Lin, Zhou, Chen".to_string()),
                submit_date: Some(date(2024, 9, 15)?),
                publish_date: None,
                journal: Some("Soil Biology and Biochemistry".to_string()),
                description: None,
                remarks: None,
            },
            OPERATOR,
        )
        .await?;

    AcademicActivityRepository::new(db.clone())
        .create(AcademicActivityInput {
            name: "National soil ecology symposium".to_string(),
            activity_type: ActivityType::Conference,
            status: ActivityStatus::Completed,
            organizer: Some("Soil Science Society".to_string()),
            start_date: Some(date(2024, 6, 7)?),
            end_date: Some(date(2024, 6, 9)?),
            location: Some("Nanjing".to_string()),
            participants: Some("Dr. Lin, Zhou".to_string()),
            description: None,
        })
        .await?;
    println!("  Created 1 outcome and 1 academic activity");
    Ok(())
}

async fn seed_plan(db: &DatabaseConnection) -> anyhow::Result<()> {
    let line = |name: &str, unit_price: Money, quantity: u32| PlanItemInput {
        category: None,
        subcategory: None,
        name: name.to_string(),
        specification: None,
        unit_price,
        quantity,
        remarks: None,
        children: vec![],
    };

    let plan = PlanRepository::new(db.clone())
        .create(BudgetPlanInput {
            name: "Follow-up proposal 2027".to_string(),
            remarks: None,
            items: vec![PlanItemInput {
                children: vec![
                    line("Gas chromatograph", wan(45)?, 1),
                    line("Soil moisture probes", wan(2)?, 6),
                ],
                ..line("Equipment", Money::ZERO, 0)
            }],
        })
        .await?;
    println!("  Created budget plan: {}", plan.plan.name);
    Ok(())
}
