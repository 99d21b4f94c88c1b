mod csv_export;
mod json;
mod spreadsheet;

pub(crate) use csv_export::write_expenses_csv;
pub(crate) use json::{read_expenses_json, write_expenses_json};
pub(crate) use spreadsheet::write_expense_report;

/// Column headers shared by the spreadsheet and CSV outputs.
pub(crate) const EXPENSE_HEADERS: [&str; 4] = ["ID", "Category", "Amount", "Date"];

pub(crate) const DEFAULT_REPORT_PATH: &str = "Expense_Report.xlsx";
pub(crate) const DEFAULT_JSON_PATH: &str = "expenses_export.json";
pub(crate) const DEFAULT_CSV_PATH: &str = "expenses_export.csv";

/// Expand a leading `~/` to the home directory.
pub(crate) fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = directories::UserDirs::new()
            .map(|d| d.home_dir().display().to_string())
            .unwrap_or_else(|| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests;
