#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_and_exact() {
    assert_eq!(truncate("Groceries", 20), "Groceries");
    assert_eq!(truncate("Rent", 4), "Rent");
}

#[test]
fn test_truncate_long_category() {
    assert_eq!(truncate("Entertainment", 6), "Enter…");
}

#[test]
fn test_truncate_zero_and_one() {
    assert_eq!(truncate("Travel", 0), "");
    assert_eq!(truncate("Travel", 1), "…");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── format_amount ──────────────────────────────────────────

#[test]
fn test_format_amount_rupee() {
    assert_eq!(format_amount(dec!(12.5), "₹"), "₹12.50");
}

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234567.89), "$"), "$1,234,567.89");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0), "€"), "€0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.5), "£"), "-£42.50");
}

#[test]
fn test_format_amount_empty_symbol() {
    assert_eq!(format_amount(dec!(999.99), ""), "999.99");
}

// ── scrolling ──────────────────────────────────────────────

#[test]
fn test_cursor_down_follows_page() {
    let mut cursor = ListCursor::default();
    for _ in 0..5 {
        assert!(cursor.down(10, 3));
    }
    assert_eq!(cursor, ListCursor { index: 5, scroll: 3 });
}

#[test]
fn test_cursor_down_stops_at_end() {
    let mut cursor = ListCursor { index: 2, scroll: 0 };
    assert!(!cursor.down(3, 10));
    assert_eq!(cursor.index, 2);
    assert!(!ListCursor::default().down(0, 10));
}

#[test]
fn test_cursor_up_pulls_scroll_back() {
    let mut cursor = ListCursor { index: 3, scroll: 3 };
    assert!(cursor.up());
    assert_eq!(cursor, ListCursor { index: 2, scroll: 2 });

    let mut cursor = ListCursor::default();
    assert!(!cursor.up());
    assert_eq!(cursor, ListCursor::default());
}

#[test]
fn test_cursor_edges() {
    let mut cursor = ListCursor { index: 4, scroll: 2 };
    cursor.top();
    assert_eq!(cursor, ListCursor::default());

    cursor.bottom(10, 4);
    assert_eq!(cursor, ListCursor { index: 9, scroll: 6 });

    cursor.bottom(0, 4);
    assert_eq!(cursor, ListCursor::default());
}

#[test]
fn test_cursor_select_scrolls_into_view() {
    let mut cursor = ListCursor::default();
    cursor.select(7, 5);
    assert_eq!(cursor, ListCursor { index: 7, scroll: 3 });
    cursor.select(1, 5);
    assert_eq!(cursor, ListCursor { index: 1, scroll: 1 });
}

#[test]
fn test_cursor_clamp_after_shrink() {
    let mut cursor = ListCursor { index: 8, scroll: 6 };
    cursor.clamp(3);
    assert_eq!(cursor, ListCursor { index: 2, scroll: 2 });
    cursor.clamp(0);
    assert_eq!(cursor, ListCursor::default());
}
