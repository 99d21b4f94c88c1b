//! Domain errors. Everything else travels as `anyhow::Error`; these are the
//! failures callers may want to match on.

use thiserror::Error;

/// Rejected numeral input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumeralError {
    #[error("No digits given")]
    Empty,

    /// `position` is 1-based, counted in characters.
    #[error("Invalid base-{base} digit '{digit}' at position {position}")]
    InvalidDigit {
        digit: char,
        position: usize,
        base: u32,
    },

    #[error("Value does not fit in 64 bits (base {base})")]
    Overflow { base: u32 },

    #[error("Unsupported base: {0} (expected 2-36)")]
    UnsupportedBase(u32),
}

/// Rejected expense fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpenseError {
    #[error("Category must not be empty")]
    EmptyCategory,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(String),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Why a seat could not be booked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Movie not found: {0}")]
    MovieNotFound(i64),

    #[error("Seat {seat} is already booked for '{movie}'")]
    SeatTaken { movie: String, seat: String },

    #[error("'{movie}' is sold out ({seats} seats)")]
    SoldOut { movie: String, seats: u32 },

    #[error("Seat label must not be empty")]
    EmptySeat,

    #[error("User name must not be empty")]
    EmptyUser,

    #[error("Invalid movie: {0}")]
    InvalidMovie(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("Please enter a valid number: '{0}'")]
    NotANumber(String),

    #[error("Quiz is already finished")]
    Finished,

    #[error("Invalid quiz settings: {0}")]
    InvalidConfig(String),
}
