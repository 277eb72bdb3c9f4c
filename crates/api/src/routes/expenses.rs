//! Expense routes: listing, editing, batch import, Excel export and
//! voucher files.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{NaiveDate, Utc};
use fundtrack_core::attachment::AttachmentKind;
use fundtrack_core::budget::BudgetCategory;
use fundtrack_core::expense::{
    Expense, ExpenseFilter, ExpenseInput, ExpenseService, ExpenseStats, expense_csv_template,
    parse_expense_csv,
};
use fundtrack_core::export::{XLSX_CONTENT_TYPE, expense_workbook};
use fundtrack_core::filter::DateRange;
use fundtrack_db::{BudgetRepository, ExpenseRepository, ProjectRepository};
use fundtrack_shared::types::{BudgetId, ExpenseId, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::attachments::{self, AttachmentResponse};
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::Operator;

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/budgets/{budget_id}/expenses",
            get(list_expenses).post(create_expense),
        )
        .route("/budgets/{budget_id}/expenses/import", post(import_expenses))
        .route("/budgets/{budget_id}/expenses/export", get(export_expenses))
        .route("/expenses/delete", post(delete_expenses))
        .route("/expenses/{expense_id}", get(get_expense).put(update_expense))
        .route(
            "/expenses/{expense_id}/voucher",
            put(upload_voucher).get(download_voucher).delete(remove_voucher),
        )
        .route("/templates/expenses", get(import_template))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query string for expense listings. Amounts are in yuan.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    /// Substring of content, specification, supplier or remarks.
    pub keyword: Option<String>,
    /// Category code.
    pub category: Option<String>,
    /// First date included.
    pub from: Option<NaiveDate>,
    /// Last date included.
    pub to: Option<NaiveDate>,
    /// Smallest amount included.
    pub min_amount: Option<Decimal>,
    /// Largest amount included.
    pub max_amount: Option<Decimal>,
}

impl ExpenseQuery {
    fn into_filter(self) -> ApiResult<ExpenseFilter> {
        let category = self
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(|c| {
                BudgetCategory::parse(c.trim())
                    .ok_or_else(|| ApiError::bad_request(format!("unknown category '{c}'")))
            })
            .transpose()?;
        Ok(ExpenseFilter {
            keyword: self.keyword,
            category,
            dates: DateRange::new(self.from, self.to),
            min_amount: self.min_amount.map(Money::from_yuan).transpose()?,
            max_amount: self.max_amount.map(Money::from_yuan).transpose()?,
        })
    }
}

/// Expenses with their statistics.
#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    /// Matching expenses ordered by date.
    pub data: Vec<Expense>,
    /// Count and totals of `data`.
    pub stats: ExpenseStats,
}

/// Query string for a CSV import.
#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    /// Date for rows that leave it empty; defaults to today.
    pub date: Option<NaiveDate>,
}

/// Result of a batch import.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// Rows inserted.
    pub imported: usize,
    /// The new expenses.
    pub expenses: Vec<Expense>,
}

/// Body of a batch delete.
#[derive(Debug, Deserialize)]
pub struct DeleteExpensesRequest {
    /// Expenses to delete.
    pub ids: Vec<ExpenseId>,
}

/// Result of a batch delete.
#[derive(Debug, Serialize)]
pub struct DeleteExpensesResponse {
    /// Expenses removed.
    pub deleted: usize,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/budgets/{budget_id}/expenses`
///
/// On the total budget this lists every expense of the project.
async fn list_expenses(
    State(state): State<AppState>,
    Path(budget_id): Path<BudgetId>,
    Query(query): Query<ExpenseQuery>,
) -> ApiResult<Json<ExpenseListResponse>> {
    let filter = query.into_filter()?;
    let data = ExpenseRepository::new(state.db.clone())
        .list(budget_id, &filter)
        .await?;
    let stats = ExpenseService::stats(&data);
    Ok(Json(ExpenseListResponse { data, stats }))
}

/// POST `/budgets/{budget_id}/expenses`
async fn create_expense(
    State(state): State<AppState>,
    operator: Operator,
    Path(budget_id): Path<BudgetId>,
    Json(input): Json<ExpenseInput>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let expense = ExpenseRepository::new(state.db.clone())
        .create(budget_id, input, operator.name())
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// POST `/budgets/{budget_id}/expenses/import`
///
/// The body is the CSV file. Either every row is inserted or none is.
async fn import_expenses(
    State(state): State<AppState>,
    operator: Operator,
    Path(budget_id): Path<BudgetId>,
    Query(query): Query<ImportQuery>,
    body: String,
) -> ApiResult<(StatusCode, Json<ImportResponse>)> {
    let default_date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let inputs = parse_expense_csv(body.trim_start_matches('\u{feff}'), default_date)?;
    let expenses = ExpenseRepository::new(state.db.clone())
        .import_batch(budget_id, inputs, operator.name())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            imported: expenses.len(),
            expenses,
        }),
    ))
}

/// GET `/budgets/{budget_id}/expenses/export`
async fn export_expenses(
    State(state): State<AppState>,
    Path(budget_id): Path<BudgetId>,
    Query(query): Query<ExpenseQuery>,
) -> ApiResult<Response> {
    let filter = query.into_filter()?;
    let budget = BudgetRepository::new(state.db.clone()).get(budget_id).await?;
    let project = ProjectRepository::new(state.db.clone())
        .get(budget.project_id)
        .await?;
    let expenses = ExpenseRepository::new(state.db.clone())
        .list(budget_id, &filter)
        .await?;

    let scope = budget.year.map_or_else(|| "总预算".to_string(), |y| format!("{y}年度"));
    let title = format!("{} {scope}支出明细", project.name);
    let bytes = expense_workbook(&title, &expenses)?;
    let filename = match budget.year {
        Some(year) => format!("expenses_{year}.xlsx"),
        None => "expenses_total.xlsx".to_string(),
    };
    Ok(xlsx_response(&filename, bytes))
}

/// GET `/expenses/{expense_id}`
async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
) -> ApiResult<Json<Expense>> {
    let expense = ExpenseRepository::new(state.db.clone()).get(expense_id).await?;
    Ok(Json(expense))
}

/// PUT `/expenses/{expense_id}`
async fn update_expense(
    State(state): State<AppState>,
    operator: Operator,
    Path(expense_id): Path<ExpenseId>,
    Json(input): Json<ExpenseInput>,
) -> ApiResult<Json<Expense>> {
    let expense = ExpenseRepository::new(state.db.clone())
        .update(expense_id, input, operator.name())
        .await?;
    Ok(Json(expense))
}

/// POST `/expenses/delete`
async fn delete_expenses(
    State(state): State<AppState>,
    operator: Operator,
    Json(request): Json<DeleteExpensesRequest>,
) -> ApiResult<Json<DeleteExpensesResponse>> {
    if request.ids.is_empty() {
        return Err(ApiError::bad_request("no expenses selected"));
    }
    let keys = ExpenseRepository::new(state.db.clone())
        .delete_many(&request.ids, operator.name())
        .await?;
    info!(count = request.ids.len(), vouchers = keys.len(), "expenses deleted");
    state.attachments(operator.name()).purge(keys).await;
    Ok(Json(DeleteExpensesResponse {
        deleted: request.ids.len(),
    }))
}

/// PUT `/expenses/{expense_id}/voucher`
async fn upload_voucher(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
    operator: Operator,
    multipart: Multipart,
) -> ApiResult<Json<AttachmentResponse>> {
    attachments::upload(
        &state,
        &operator,
        AttachmentKind::Voucher,
        expense_id.into_inner(),
        multipart,
    )
    .await
}

/// GET `/expenses/{expense_id}/voucher`
async fn download_voucher(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
) -> ApiResult<Response> {
    attachments::download(&state, AttachmentKind::Voucher, expense_id.into_inner()).await
}

/// DELETE `/expenses/{expense_id}/voucher`
async fn remove_voucher(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
    operator: Operator,
) -> ApiResult<StatusCode> {
    attachments::remove(&state, &operator, AttachmentKind::Voucher, expense_id.into_inner()).await
}

/// GET `/templates/expenses`
async fn import_template() -> Response {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment; filename=\"expense_template.csv\""),
            ),
        ],
        expense_csv_template(),
    )
        .into_response()
}

/// Wraps workbook bytes as a download.
pub(crate) fn xlsx_response(filename: &str, bytes: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
