#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::expense::normalize_date;
use super::*;
use crate::error::{BookingError, ExpenseError};

// ── Expense ───────────────────────────────────────────────────

#[test]
fn test_expense_new() {
    let e = Expense::new("  Groceries ", dec!(12.50), "2024-01-05").unwrap();
    assert!(e.id.is_none());
    assert_eq!(e.category, "Groceries");
    assert_eq!(e.amount, dec!(12.50));
    assert_eq!(e.date, "2024-01-05");
    assert_eq!(e.month(), "2024-01");
}

#[test]
fn test_expense_zero_amount_allowed() {
    assert!(Expense::new("Gift", Decimal::ZERO, "2024-01-05").is_ok());
}

#[test]
fn test_expense_rejects_bad_fields() {
    assert_eq!(
        Expense::new("   ", dec!(1), "2024-01-05"),
        Err(ExpenseError::EmptyCategory)
    );
    assert!(matches!(
        Expense::new("Food", dec!(-3), "2024-01-05"),
        Err(ExpenseError::NegativeAmount(_))
    ));
    assert!(matches!(
        Expense::new("Food", dec!(3), "2024-02-30"),
        Err(ExpenseError::InvalidDate(_))
    ));
    assert!(matches!(
        Expense::new("Food", dec!(3), "05/01/2024"),
        Err(ExpenseError::InvalidDate(_))
    ));
}

#[test]
fn test_expense_validated_keeps_id() {
    let raw = Expense {
        id: Some(9),
        category: " Rent ".into(),
        amount: dec!(800),
        date: "2024-3-1".into(),
    };
    let checked = raw.validated().unwrap();
    assert_eq!(checked.id, Some(9));
    assert_eq!(checked.category, "Rent");
    assert_eq!(checked.date, "2024-03-01");
}

#[test]
fn test_expense_display() {
    let mut e = Expense::new("Food", dec!(4.5), "2024-01-05").unwrap();
    e.id = Some(3);
    assert_eq!(e.to_string(), "3. Food | 4.50 | 2024-01-05");
}

// ── parse_amount / normalize_date ─────────────────────────────

#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount("12.5").unwrap(), dec!(12.5));
    assert_eq!(parse_amount("$1,234.50").unwrap(), dec!(1234.50));
    assert_eq!(parse_amount("₹40").unwrap(), dec!(40));
    assert_eq!(parse_amount(" 7 ").unwrap(), dec!(7));
}

#[test]
fn test_parse_amount_invalid() {
    assert!(parse_amount("").is_err());
    assert!(parse_amount("$").is_err());
    assert!(parse_amount("ten").is_err());
}

#[test]
fn test_normalize_date() {
    assert_eq!(normalize_date("2024-01-05").unwrap(), "2024-01-05");
    assert_eq!(normalize_date(" 2024-1-5 ").unwrap(), "2024-01-05");
    assert!(normalize_date("2023-02-29").is_err());
    assert!(normalize_date("yesterday").is_err());
}

#[test]
fn test_today_is_valid_date() {
    assert!(normalize_date(&today()).is_ok());
}

// ── Expense JSON shape ────────────────────────────────────────

#[test]
fn test_expense_json_shape() {
    let mut e = Expense::new("Food", dec!(12.5), "2024-01-05").unwrap();
    e.id = Some(1);
    let value = serde_json::to_value(&e).unwrap();
    assert_eq!(value["id"], 1);
    assert_eq!(value["category"], "Food");
    assert_eq!(value["amount"].as_f64(), Some(12.5));
    assert_eq!(value["date"], "2024-01-05");
}

#[test]
fn test_expense_json_missing_id_and_integer_amount() {
    let e: Expense =
        serde_json::from_str(r#"{"category": "Bus", "amount": 40, "date": "2024-02-01"}"#)
            .unwrap();
    assert!(e.id.is_none());
    assert_eq!(e.amount, dec!(40));
}

// ── Movie / Booking ───────────────────────────────────────────

#[test]
fn test_movie_new() {
    let m = Movie::new(" Dune ", 120).unwrap();
    assert_eq!(m.name, "Dune");
    assert_eq!(m.seats, 120);
    assert_eq!(m.to_string(), "Dune");
}

#[test]
fn test_movie_invalid() {
    assert!(matches!(
        Movie::new("", 10),
        Err(BookingError::InvalidMovie(_))
    ));
    assert!(matches!(
        Movie::new("Dune", 0),
        Err(BookingError::InvalidMovie(_))
    ));
}

#[test]
fn test_movie_find_by_id() {
    let mut a = Movie::new("A", 1).unwrap();
    a.id = Some(1);
    let mut b = Movie::new("B", 1).unwrap();
    b.id = Some(2);
    let movies = vec![a, b];
    assert_eq!(Movie::find_by_id(&movies, 2).unwrap().name, "B");
    assert!(Movie::find_by_id(&movies, 3).is_none());
}

#[test]
fn test_booking_new_normalizes_seat() {
    let b = Booking::new(1, " a7 ", " Priya ").unwrap();
    assert_eq!(b.seat, "A7");
    assert_eq!(b.user, "Priya");
    assert!(!b.created_at.is_empty());
}

#[test]
fn test_booking_requires_seat_and_user() {
    assert_eq!(Booking::new(1, "  ", "x"), Err(BookingError::EmptySeat));
    assert_eq!(Booking::new(1, "A1", ""), Err(BookingError::EmptyUser));
}

// ── History ───────────────────────────────────────────────────

#[test]
fn test_quiz_result_display() {
    assert_eq!(QuizResult::new(4, 5).to_string(), "4/5");
}

#[test]
fn test_conversion_new() {
    let c = Conversion::new("1011", 2, 11);
    assert!(c.id.is_none());
    assert_eq!(c.value, 11);
}
