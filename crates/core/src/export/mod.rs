//! Moving project data in and out: JSON bundles and Excel workbooks.

mod bundle;
mod error;
mod workbook;

pub use bundle::{BUNDLE_FORMAT_VERSION, BundleBudget, BundleExpense, ProjectBundle};
pub use error::ExportError;
pub use workbook::{XLSX_CONTENT_TYPE, budget_workbook, expense_workbook};
