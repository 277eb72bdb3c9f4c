//! Excel workbooks for expense lists and budget execution.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use super::error::ExportError;
use crate::budget::{BudgetUsage, ProjectBudgetOverview};
use crate::expense::{Expense, ExpenseService};
use crate::project::Project;

/// MIME type of the generated files.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const EXPENSE_HEADERS: [&str; 7] = [
    "费用类别",
    "开支内容",
    "规格型号",
    "供应商",
    "报账金额（元）",
    "报账日期",
    "备注",
];

const BUDGET_HEADERS: [&str; 6] = [
    "预算范围",
    "费用类别",
    "预算（万元）",
    "已支出（万元）",
    "结余（万元）",
    "执行率（%）",
];

fn number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn write_header(
    sheet: &mut Worksheet,
    row: u32,
    headers: &[&str],
    bold: &Format,
) -> Result<(), XlsxError> {
    for (col, header) in (0u16..).zip(headers) {
        sheet.write_string_with_format(row, col, *header, bold)?;
        sheet.set_column_width(col, 16)?;
    }
    Ok(())
}

/// Expense list with a totals row.
///
/// # Errors
///
/// `Workbook` if the spreadsheet cannot be written.
pub fn expense_workbook(title: &str, expenses: &[Expense]) -> Result<Vec<u8>, ExportError> {
    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");
    let bold_money = Format::new().set_bold().set_num_format("#,##0.00");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("支出明细")?;
    sheet.write_string_with_format(0, 0, title, &bold)?;
    write_header(sheet, 1, &EXPENSE_HEADERS, &bold)?;

    let mut row = 2u32;
    for expense in expenses {
        sheet.write_string(row, 0, expense.category.label())?;
        sheet.write_string(row, 1, &expense.content)?;
        sheet.write_string(row, 2, expense.specification.as_deref().unwrap_or_default())?;
        sheet.write_string(row, 3, expense.supplier.as_deref().unwrap_or_default())?;
        sheet.write_number_with_format(row, 4, number(expense.amount.yuan()), &money)?;
        sheet.write_string(row, 5, expense.expense_date.format("%Y-%m-%d").to_string())?;
        sheet.write_string(row, 6, expense.remarks.as_deref().unwrap_or_default())?;
        row += 1;
    }

    let stats = ExpenseService::stats(expenses);
    sheet.write_string_with_format(row, 0, "合计", &bold)?;
    sheet.write_string_with_format(row, 1, format!("{} 笔", stats.count), &bold)?;
    sheet.write_number_with_format(row, 4, number(stats.total.yuan()), &bold_money)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_usage(
    sheet: &mut Worksheet,
    row: &mut u32,
    scope: &str,
    usage: &BudgetUsage,
    formats: (&Format, &Format),
) -> Result<(), XlsxError> {
    let (money, bold_money) = formats;
    for line in &usage.lines {
        sheet.write_string(*row, 0, scope)?;
        sheet.write_string(*row, 1, line.category.label())?;
        sheet.write_number_with_format(*row, 2, number(line.allocated.wan()), money)?;
        sheet.write_number_with_format(*row, 3, number(line.spent.wan()), money)?;
        sheet.write_number_with_format(*row, 4, number(line.remaining.wan()), money)?;
        sheet.write_number_with_format(*row, 5, number(line.execution_rate), money)?;
        *row += 1;
    }
    sheet.write_string(*row, 0, scope)?;
    sheet.write_string(*row, 1, "小计")?;
    sheet.write_number_with_format(*row, 2, number(usage.allocated.wan()), bold_money)?;
    sheet.write_number_with_format(*row, 3, number(usage.spent.wan()), bold_money)?;
    sheet.write_number_with_format(*row, 4, number(usage.remaining.wan()), bold_money)?;
    sheet.write_number_with_format(*row, 5, number(usage.execution_rate), bold_money)?;
    *row += 1;
    Ok(())
}

/// Budget execution of the total budget and every annual budget.
///
/// # Errors
///
/// `Workbook` if the spreadsheet cannot be written.
pub fn budget_workbook(
    project: &Project,
    overview: &ProjectBudgetOverview,
) -> Result<Vec<u8>, ExportError> {
    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00####");
    let bold_money = Format::new().set_bold().set_num_format("#,##0.00####");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("预算执行")?;
    sheet.write_string_with_format(0, 0, &project.name, &bold)?;
    write_header(sheet, 1, &BUDGET_HEADERS, &bold)?;

    let mut row = 2u32;
    write_usage(sheet, &mut row, "总预算", &overview.total, (&money, &bold_money))?;
    for annual in &overview.annual {
        let scope = annual
            .year
            .map_or_else(|| "总预算".to_string(), |year| format!("{year}年度"));
        write_usage(sheet, &mut row, &scope, annual, (&money, &bold_money))?;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "已分配至年度", &bold)?;
    sheet.write_number_with_format(row, 2, number(overview.allocated_to_years.wan()), &money)?;
    row += 1;
    sheet.write_string_with_format(row, 0, "未分配", &bold)?;
    sheet.write_number_with_format(row, 2, number(overview.unallocated.wan()), &money)?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{AnnualBudgetSnapshot, BudgetCategory, BudgetService, CategoryAmounts};
    use chrono::{NaiveDate, Utc};
    use fundtrack_shared::types::{BudgetId, ExpenseId, Money, ProjectId};

    fn is_zip(bytes: &[u8]) -> bool {
        bytes.starts_with(b"PK")
    }

    #[test]
    fn test_expense_workbook() {
        let now = Utc::now();
        let expenses = vec![Expense {
            id: ExpenseId::new(),
            project_id: ProjectId::new(),
            budget_id: BudgetId::new(),
            category: BudgetCategory::Material,
            content: "Reagent".to_string(),
            specification: Some("500ml".to_string()),
            supplier: None,
            amount: Money::from_fen(12_345),
            expense_date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            remarks: None,
            voucher_key: None,
            created_at: now,
            updated_at: now,
        }];
        let bytes = expense_workbook("2024 expenses", &expenses).unwrap();
        assert!(is_zip(&bytes));
        assert!(is_zip(&expense_workbook("empty", &[]).unwrap()));
    }

    #[test]
    fn test_budget_workbook() {
        let now = Utc::now();
        let project = Project {
            id: ProjectId::new(),
            name: "Wetland survey".to_string(),
            financial_code: None,
            project_code: None,
            project_type: None,
            leader: None,
            start_date: None,
            end_date: None,
            total_budget: Money::from_fen(100_000_000),
            created_at: now,
            updated_at: now,
        };
        let total: CategoryAmounts = [(BudgetCategory::Labor, Money::from_fen(100_000_000))]
            .into_iter()
            .collect();
        let annual = [AnnualBudgetSnapshot {
            year: 2024,
            allocation: [(BudgetCategory::Labor, Money::from_fen(40_000_000))]
                .into_iter()
                .collect(),
            spent: [(BudgetCategory::Labor, Money::from_fen(1_000_000))]
                .into_iter()
                .collect(),
        }];
        let overview = BudgetService::overview(&total, &annual);
        assert!(is_zip(&budget_workbook(&project, &overview).unwrap()));
    }
}
