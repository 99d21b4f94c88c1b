mod booking;
mod expense;
mod history;
mod movie;

pub use booking::{normalize_seat, Booking};
pub use expense::{parse_amount, today, Expense};
pub use history::{Conversion, QuizResult};
pub use movie::Movie;

#[cfg(test)]
mod tests;
