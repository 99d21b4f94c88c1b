#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;
use std::io::Read;

use super::*;
use crate::error::ExpenseError;
use crate::models::Expense;

fn sample_expenses() -> Vec<Expense> {
    let mut a = Expense::new("Groceries", dec!(12.50), "2024-01-05").unwrap();
    a.id = Some(1);
    let mut b = Expense::new("Transport", dec!(3), "2024-01-06").unwrap();
    b.id = Some(2);
    vec![a, b]
}

fn read_zip_entry(path: &std::path::Path, name: &str) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}

// ── Spreadsheet ───────────────────────────────────────────────

#[test]
fn test_report_contains_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    let rows = write_expense_report(&path, &sample_expenses()).unwrap();
    assert_eq!(rows, 2);

    let workbook = read_zip_entry(&path, "xl/workbook.xml");
    assert!(workbook.contains("Expenses Report"));

    let strings = read_zip_entry(&path, "xl/sharedStrings.xml");
    for header in EXPENSE_HEADERS {
        assert!(strings.contains(header), "missing header {header}");
    }
    assert!(strings.contains("Groceries"));
    assert!(strings.contains("2024-01-06"));

    let sheet = read_zip_entry(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<v>12.5</v>"));
}

#[test]
fn test_report_with_no_expenses_has_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");
    assert_eq!(write_expense_report(&path, &[]).unwrap(), 0);
    let strings = read_zip_entry(&path, "xl/sharedStrings.xml");
    assert!(strings.contains("Category"));
}

#[test]
fn test_report_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("report.xlsx");
    assert!(write_expense_report(&path, &sample_expenses()).is_err());
}

// ── JSON ──────────────────────────────────────────────────────

#[test]
fn test_json_export_is_pretty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    write_expenses_json(&path, &sample_expenses()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n"));
    assert!(text.contains("\"category\": \"Groceries\""));

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let arr = value.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["amount"].as_f64(), Some(12.5));
    assert_eq!(arr[1]["id"], 2);
}

#[test]
fn test_json_export_then_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let original = sample_expenses();
    write_expenses_json(&path, &original).unwrap();
    assert_eq!(read_expenses_json(&path).unwrap(), original);
}

#[test]
fn test_json_keeps_every_digit_of_large_amounts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.json");
    let big = Expense::new("Property", dec!(12345678901234567.89), "2024-02-01").unwrap();
    write_expenses_json(&path, std::slice::from_ref(&big)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"amount\": 12345678901234567.89"));

    let back = read_expenses_json(&path).unwrap();
    assert_eq!(back[0].amount.to_string(), "12345678901234567.89");
}

#[test]
fn test_json_import_accepts_hand_written_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.json");
    std::fs::write(
        &path,
        r#"[{"category": " Books ", "amount": 20, "date": "2024-3-9"}]"#,
    )
    .unwrap();

    let imported = read_expenses_json(&path).unwrap();
    assert_eq!(imported.len(), 1);
    assert!(imported[0].id.is_none());
    assert_eq!(imported[0].category, "Books");
    assert_eq!(imported[0].date, "2024-03-09");
}

#[test]
fn test_json_import_rejects_invalid_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"[
            {"id": 1, "category": "Food", "amount": 1.5, "date": "2024-01-01"},
            {"id": 2, "category": "Food", "amount": 2.5, "date": "not a date"}
        ]"#,
    )
    .unwrap();

    let err = read_expenses_json(&path).unwrap_err();
    assert!(err.to_string().contains("index 1"));
    assert!(matches!(
        err.downcast_ref::<ExpenseError>(),
        Some(ExpenseError::InvalidDate(_))
    ));
}

#[test]
fn test_json_import_malformed_and_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(read_expenses_json(&path).is_err());
    assert!(read_expenses_json(&dir.path().join("absent.json")).is_err());
}

// ── CSV ───────────────────────────────────────────────────────

#[test]
fn test_csv_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    assert_eq!(write_expenses_csv(&path, &sample_expenses()).unwrap(), 2);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "ID,Category,Amount,Date");
    assert_eq!(lines[1], "1,Groceries,12.50,2024-01-05");
    assert_eq!(lines[2], "2,Transport,3.00,2024-01-06");
}

// ── Paths ─────────────────────────────────────────────────────

#[test]
fn test_expand_home() {
    assert_eq!(expand_home("report.xlsx"), "report.xlsx");
    assert_eq!(expand_home("/tmp/x.json"), "/tmp/x.json");
    let expanded = expand_home("~/x.json");
    assert!(expanded.ends_with("/x.json"));
    assert!(!expanded.starts_with('~'));
}
