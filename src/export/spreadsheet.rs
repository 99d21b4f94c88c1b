use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

use super::EXPENSE_HEADERS;
use crate::models::Expense;

pub(crate) const SHEET_NAME: &str = "Expenses Report";

/// Write an `.xlsx` report: one header row, then one row per expense.
pub(crate) fn write_expense_report(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in EXPENSE_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, expense) in expenses.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, expense.id.unwrap_or(0) as f64)?;
        sheet.write_string(row, 1, &expense.category)?;
        sheet.write_number_with_format(
            row,
            2,
            expense.amount.to_f64().unwrap_or_default(),
            &money,
        )?;
        sheet.write_string(row, 3, &expense.date)?;
    }

    sheet.autofit();

    workbook
        .save(path)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!(path = %path.display(), rows = expenses.len(), "Spreadsheet report written");
    Ok(expenses.len())
}
