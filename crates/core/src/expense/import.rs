//! CSV batch import of expenses.
//!
//! The header row names the columns; order does not matter. Required columns
//! are 费用类别 / 开支内容 / 报账金额 (or `category` / `content` / `amount`).
//! A file is accepted only if every row is valid.

use std::str::FromStr;

use chrono::NaiveDate;
use fundtrack_shared::types::Money;
use rust_decimal::Decimal;

use super::error::{ExpenseError, ImportRowError};
use super::service::ExpenseService;
use super::types::ExpenseInput;
use crate::budget::BudgetCategory;

/// Header row of the downloadable template, in column order.
pub const IMPORT_TEMPLATE_HEADERS: [&str; 7] = [
    "费用类别",
    "开支内容",
    "规格型号",
    "供应商",
    "报账金额",
    "报账日期",
    "备注",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

#[derive(Clone, Copy)]
enum Column {
    Category,
    Content,
    Specification,
    Supplier,
    Amount,
    Date,
    Remarks,
}

impl Column {
    const ALL: [Self; 7] = [
        Self::Category,
        Self::Content,
        Self::Specification,
        Self::Supplier,
        Self::Amount,
        Self::Date,
        Self::Remarks,
    ];

    const fn label(self) -> &'static str {
        IMPORT_TEMPLATE_HEADERS[self as usize]
    }

    const fn alias(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Content => "content",
            Self::Specification => "specification",
            Self::Supplier => "supplier",
            Self::Amount => "amount",
            Self::Date => "date",
            Self::Remarks => "remarks",
        }
    }

    const fn required(self) -> bool {
        matches!(self, Self::Category | Self::Content | Self::Amount)
    }
}

/// Header positions resolved from the first row.
struct Layout([Option<usize>; 7]);

impl Layout {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, ExpenseError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();

        let mut positions = [None; 7];
        for column in Column::ALL {
            positions[column as usize] = names
                .iter()
                .position(|n| n == column.label() || n == column.alias());
            if column.required() && positions[column as usize].is_none() {
                return Err(ExpenseError::MissingColumn(column.label()));
            }
        }
        Ok(Self(positions))
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, column: Column) -> Option<&'r str> {
        self.0[column as usize]
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Returns the CSV template: the header row only.
#[must_use]
pub fn expense_csv_template() -> String {
    let mut line = IMPORT_TEMPLATE_HEADERS.join(",");
    line.push('\n');
    line
}

/// Parses an expense CSV.
///
/// Rows without a date are dated `default_date`. Blank rows are skipped.
///
/// # Errors
///
/// `MissingColumn` or `MalformedFile` for structural problems, `EmptyImport`
/// when no data rows remain, and `RowsRejected` listing every invalid row.
pub fn parse_expense_csv(
    content: &str,
    default_date: NaiveDate,
) -> Result<Vec<ExpenseInput>, ExpenseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ExpenseError::MalformedFile(e.to_string()))?
        .clone();
    let layout = Layout::resolve(&headers)?;

    let mut expenses = Vec::new();
    let mut rejected = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row = index + 2;
        let record = record.map_err(|e| ExpenseError::MalformedFile(e.to_string()))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        match parse_row(&layout, &record, default_date) {
            Ok(expense) => expenses.push(expense),
            Err(message) => rejected.push(ImportRowError { row, message }),
        }
    }

    if !rejected.is_empty() {
        return Err(ExpenseError::RowsRejected(rejected));
    }
    if expenses.is_empty() {
        return Err(ExpenseError::EmptyImport);
    }
    Ok(expenses)
}

fn parse_row(
    layout: &Layout,
    record: &csv::StringRecord,
    default_date: NaiveDate,
) -> Result<ExpenseInput, String> {
    let mut problems = Vec::new();

    let category = match layout.get(record, Column::Category) {
        Some(raw) => BudgetCategory::parse(raw).or_else(|| {
            problems.push(format!("unknown category '{raw}'"));
            None
        }),
        None => {
            problems.push("category is empty".to_string());
            None
        }
    };

    let amount = match layout.get(record, Column::Amount) {
        Some(raw) => parse_amount(raw).map_err(|e| problems.push(e)).ok(),
        None => {
            problems.push("amount is empty".to_string());
            None
        }
    };

    let expense_date = match layout.get(record, Column::Date) {
        Some(raw) => parse_date(raw)
            .ok_or_else(|| problems.push(format!("unrecognised date '{raw}'")))
            .ok(),
        None => Some(default_date),
    };

    let content = layout.get(record, Column::Content).unwrap_or_default();

    let (Some(category), Some(amount), Some(expense_date)) = (category, amount, expense_date)
    else {
        return Err(problems.join(", "));
    };

    ExpenseService::normalize(ExpenseInput {
        category,
        content: content.to_string(),
        specification: layout.get(record, Column::Specification).map(String::from),
        supplier: layout.get(record, Column::Supplier).map(String::from),
        amount,
        expense_date,
        remarks: layout.get(record, Column::Remarks).map(String::from),
    })
    .map_err(|e| e.to_string())
}

fn parse_amount(raw: &str) -> Result<Money, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '，' | '¥' | '￥' | ' '))
        .collect();
    let cleaned = cleaned.trim_end_matches('元');
    let value = Decimal::from_str(cleaned).map_err(|_| format!("invalid amount '{raw}'"))?;
    Money::from_yuan(value).map_err(|e| e.to_string())
}

/// Parses the date formats accepted by the importer. A trailing time part
/// (`2024-03-01 00:00:00`) is ignored.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}
