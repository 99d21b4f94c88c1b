use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::models::Expense;

/// Pretty-printed JSON array of flat expense objects.
pub(crate) fn write_expenses_json(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, expenses).context("Failed to serialize expenses")?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), count = expenses.len(), "Expenses exported to JSON");
    Ok(expenses.len())
}

/// Read a JSON array of expenses. Every record goes through the same checks
/// as typed input; the first bad record fails the whole file.
pub(crate) fn read_expenses_json(path: &Path) -> Result<Vec<Expense>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
    let raw: Vec<Expense> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Malformed expense JSON: {}", path.display()))?;

    let expenses = raw
        .into_iter()
        .enumerate()
        .map(|(i, e)| {
            e.validated()
                .with_context(|| format!("Invalid expense at index {i}"))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(path = %path.display(), count = expenses.len(), "Expenses read from JSON");
    Ok(expenses)
}
