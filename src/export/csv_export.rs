use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::EXPENSE_HEADERS;
use crate::models::Expense;

pub(crate) fn write_expenses_csv(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    wtr.write_record(EXPENSE_HEADERS)?;
    for expense in expenses {
        wtr.write_record([
            expense.id.unwrap_or(0).to_string(),
            expense.category.clone(),
            format!("{:.2}", expense.amount),
            expense.date.clone(),
        ])?;
    }
    wtr.flush()?;
    info!(path = %path.display(), count = expenses.len(), "Expenses exported to CSV");
    Ok(expenses.len())
}
