use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ExpenseError;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default)]
    pub id: Option<i64>,
    pub category: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    /// Format: "YYYY-MM-DD"
    pub date: String,
}

impl Expense {
    /// Build a validated, not-yet-stored expense.
    pub fn new(category: &str, amount: Decimal, date: &str) -> Result<Self, ExpenseError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ExpenseError::EmptyCategory);
        }
        if amount < Decimal::ZERO {
            return Err(ExpenseError::NegativeAmount(amount.to_string()));
        }
        Ok(Self {
            id: None,
            category: category.to_string(),
            amount,
            date: normalize_date(date)?,
        })
    }

    /// Re-run the constructor checks on a record that came from outside
    /// (e.g. a JSON file), keeping its id.
    pub fn validated(self) -> Result<Self, ExpenseError> {
        let id = self.id;
        let mut checked = Self::new(&self.category, self.amount, &self.date)?;
        checked.id = id;
        Ok(checked)
    }

    /// "YYYY-MM" part of the date.
    pub fn month(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }
}

/// Parse a user-typed amount. Accepts currency symbols and thousands
/// separators: `12.5`, `$1,234.50`, `₹40`.
pub fn parse_amount(s: &str) -> Result<Decimal, ExpenseError> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '₹' | '€' | '£' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Err(ExpenseError::InvalidAmount(s.to_string()));
    }
    Decimal::from_str(&cleaned).map_err(|_| ExpenseError::InvalidAmount(s.to_string()))
}

/// Validate a `YYYY-MM-DD` date and return it zero-padded.
pub fn normalize_date(s: &str) -> Result<String, ExpenseError> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|_| ExpenseError::InvalidDate(trimmed.to_string()))
}

pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

impl std::fmt::Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}. {} | {:.2} | {}",
            self.id.unwrap_or(0),
            self.category,
            self.amount,
            self.date
        )
    }
}
