#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn expense(category: &str, amount: Decimal, date: &str) -> Expense {
    Expense::new(category, amount, date).unwrap()
}

fn setup_expenses(db: &Database) {
    for e in [
        expense("Groceries", dec!(42.10), "2024-01-15"),
        expense("Transport", dec!(3.50), "2024-01-10"),
        expense("Groceries", dec!(17.90), "2024-02-02"),
        expense("Rent", dec!(800), "2024-02-01"),
    ] {
        db.insert_expense(&e).unwrap();
    }
}

fn add_movie(db: &Database, name: &str, seats: u32) -> i64 {
    db.insert_movie(&Movie::new(name, seats).unwrap()).unwrap()
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_current_version() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
}

#[test]
fn test_reopen_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kitbag.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_expense(&expense("Food", dec!(1), "2024-01-01"))
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_expense_count().unwrap(), 1);
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
}

// ── Expense CRUD ──────────────────────────────────────────────

#[test]
fn test_expense_crud() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_expense(&expense("Groceries", dec!(12.50), "2024-01-05"))
        .unwrap();

    let fetched = db.get_expense_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.id, Some(id));
    assert_eq!(fetched.category, "Groceries");
    assert_eq!(fetched.amount, dec!(12.50));
    assert_eq!(fetched.date, "2024-01-05");

    assert!(db.delete_expense(id).unwrap());
    assert!(db.get_expense_by_id(id).unwrap().is_none());
}

#[test]
fn test_delete_missing_expense_reports_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(!db.delete_expense(99999).unwrap());
}

#[test]
fn test_ids_not_reused_after_delete() {
    let db = Database::open_in_memory().unwrap();
    let first = db
        .insert_expense(&expense("A", dec!(1), "2024-01-01"))
        .unwrap();
    db.delete_expense(first).unwrap();
    let second = db
        .insert_expense(&expense("B", dec!(1), "2024-01-01"))
        .unwrap();
    assert!(second > first);
}

#[test]
fn test_amount_precision_preserved() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_expense(&expense("Coffee", dec!(0.10), "2024-01-01"))
        .unwrap();
    db.insert_expense(&expense("Coffee", dec!(0.20), "2024-01-01"))
        .unwrap();
    assert_eq!(
        db.get_expense_by_id(id).unwrap().unwrap().amount,
        dec!(0.10)
    );
    assert_eq!(db.get_total_spending(None).unwrap(), dec!(0.30));
}

#[test]
fn test_get_expenses_ordered_by_date() {
    let db = Database::open_in_memory().unwrap();
    setup_expenses(&db);
    let dates: Vec<String> = db
        .get_expenses(None)
        .unwrap()
        .into_iter()
        .map(|e| e.date)
        .collect();
    assert_eq!(
        dates,
        vec!["2024-01-10", "2024-01-15", "2024-02-01", "2024-02-02"]
    );
}

#[test]
fn test_get_expenses_month_filter() {
    let db = Database::open_in_memory().unwrap();
    setup_expenses(&db);
    let jan = db.get_expenses(Some("2024-01")).unwrap();
    assert_eq!(jan.len(), 2);
    assert!(jan.iter().all(|e| e.date.starts_with("2024-01")));
    assert!(db.get_expenses(Some("2023-12")).unwrap().is_empty());
}

#[test]
fn test_insert_expenses_batch_assigns_fresh_ids() {
    let mut db = Database::open_in_memory().unwrap();
    let existing = db
        .insert_expense(&expense("Food", dec!(5), "2024-01-01"))
        .unwrap();

    let mut imported = expense("Books", dec!(20), "2024-01-02");
    imported.id = Some(existing);
    let count = db
        .insert_expenses_batch(&[imported, expense("Gym", dec!(30), "2024-01-03")])
        .unwrap();

    assert_eq!(count, 2);
    let all = db.get_expenses(None).unwrap();
    assert_eq!(all.len(), 3);
    let ids: std::collections::HashSet<i64> = all.iter().filter_map(|e| e.id).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_insert_expenses_batch_empty() {
    let mut db = Database::open_in_memory().unwrap();
    assert_eq!(db.insert_expenses_batch(&[]).unwrap(), 0);
    assert_eq!(db.get_expense_count().unwrap(), 0);
}

// ── Analytics ─────────────────────────────────────────────────

#[test]
fn test_spending_by_category() {
    let db = Database::open_in_memory().unwrap();
    setup_expenses(&db);

    let all = db.get_spending_by_category(None).unwrap();
    assert_eq!(
        all,
        vec![
            ("Rent".to_string(), dec!(800)),
            ("Groceries".to_string(), dec!(60.00)),
            ("Transport".to_string(), dec!(3.50)),
        ]
    );

    let feb = db.get_spending_by_category(Some("2024-02")).unwrap();
    assert_eq!(feb.len(), 2);
    assert_eq!(feb[1], ("Groceries".to_string(), dec!(17.90)));
}

#[test]
fn test_total_spending() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get_total_spending(None).unwrap(), Decimal::ZERO);
    setup_expenses(&db);
    assert_eq!(db.get_total_spending(None).unwrap(), dec!(863.50));
    assert_eq!(db.get_total_spending(Some("2024-01")).unwrap(), dec!(45.60));
}

// ── Movies & bookings ─────────────────────────────────────────

#[test]
fn test_movie_crud() {
    let db = Database::open_in_memory().unwrap();
    let id = add_movie(&db, "Dune", 120);
    let movie = db.get_movie_by_id(id).unwrap().unwrap();
    assert_eq!(movie.name, "Dune");
    assert_eq!(movie.seats, 120);
    assert!(db.get_movie_by_id(id + 1).unwrap().is_none());

    add_movie(&db, "Alien", 80);
    let names: Vec<String> = db.get_movies().unwrap().into_iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["Alien", "Dune"]);
}

#[test]
fn test_book_seat() {
    let mut db = Database::open_in_memory().unwrap();
    let movie_id = add_movie(&db, "Dune", 10);

    let id = db.book_seat(movie_id, "a7", "Priya").unwrap();
    let bookings = db.get_bookings(Some(movie_id)).unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, Some(id));
    assert_eq!(bookings[0].seat, "A7");
    assert_eq!(bookings[0].user, "Priya");
    assert_eq!(db.get_booked_count(movie_id).unwrap(), 1);
}

#[test]
fn test_book_taken_seat_rejected() {
    let mut db = Database::open_in_memory().unwrap();
    let movie_id = add_movie(&db, "Dune", 10);
    db.book_seat(movie_id, "A7", "Priya").unwrap();

    let err = db.book_seat(movie_id, " a7", "Sam").unwrap_err();
    assert_eq!(
        err.downcast_ref::<BookingError>(),
        Some(&BookingError::SeatTaken {
            movie: "Dune".into(),
            seat: "A7".into()
        })
    );
    assert_eq!(db.get_booked_count(movie_id).unwrap(), 1);
}

#[test]
fn test_same_seat_different_movies() {
    let mut db = Database::open_in_memory().unwrap();
    let a = add_movie(&db, "Dune", 10);
    let b = add_movie(&db, "Alien", 10);
    db.book_seat(a, "A1", "x").unwrap();
    db.book_seat(b, "A1", "y").unwrap();
    assert_eq!(db.get_bookings(None).unwrap().len(), 2);
}

#[test]
fn test_sold_out() {
    let mut db = Database::open_in_memory().unwrap();
    let movie_id = add_movie(&db, "Tiny", 2);
    db.book_seat(movie_id, "1", "a").unwrap();
    db.book_seat(movie_id, "2", "b").unwrap();

    let err = db.book_seat(movie_id, "3", "c").unwrap_err();
    assert_eq!(
        err.downcast_ref::<BookingError>(),
        Some(&BookingError::SoldOut {
            movie: "Tiny".into(),
            seats: 2
        })
    );
}

#[test]
fn test_book_unknown_movie() {
    let mut db = Database::open_in_memory().unwrap();
    let err = db.book_seat(42, "A1", "x").unwrap_err();
    assert_eq!(
        err.downcast_ref::<BookingError>(),
        Some(&BookingError::MovieNotFound(42))
    );
}

#[test]
fn test_book_requires_user() {
    let mut db = Database::open_in_memory().unwrap();
    let movie_id = add_movie(&db, "Dune", 10);
    let err = db.book_seat(movie_id, "A1", "  ").unwrap_err();
    assert_eq!(
        err.downcast_ref::<BookingError>(),
        Some(&BookingError::EmptyUser)
    );
}

#[test]
fn test_cancel_booking_frees_seat() {
    let mut db = Database::open_in_memory().unwrap();
    let movie_id = add_movie(&db, "Tiny", 1);
    let id = db.book_seat(movie_id, "A1", "a").unwrap();

    assert!(db.cancel_booking(id).unwrap());
    assert!(!db.cancel_booking(id).unwrap());
    assert_eq!(db.get_booked_count(movie_id).unwrap(), 0);
    db.book_seat(movie_id, "A1", "b").unwrap();
}

// ── History ───────────────────────────────────────────────────

#[test]
fn test_conversions_newest_first() {
    let db = Database::open_in_memory().unwrap();
    db.record_conversion(&Conversion::new("1011", 2, 11))
        .unwrap();
    db.record_conversion(&Conversion::new("ff", 16, 255))
        .unwrap();
    db.record_conversion(&Conversion::new(&"1".repeat(64), 2, u64::MAX))
        .unwrap();

    let recent = db.get_conversions(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].value, u64::MAX);
    assert_eq!(recent[1].input, "ff");
    assert_eq!(recent[1].base, 16);
}

#[test]
fn test_quiz_results_newest_first() {
    let db = Database::open_in_memory().unwrap();
    db.record_quiz_result(&QuizResult::new(3, 5)).unwrap();
    db.record_quiz_result(&QuizResult::new(5, 5)).unwrap();

    let results = db.get_quiz_results(10).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].score, 5);
    assert_eq!(results[1].score, 3);
    assert!(results.iter().all(|r| r.id.is_some()));
}
