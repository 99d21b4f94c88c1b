mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::BookingError;
use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        info!(path = %path.display(), "Database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            info!(version = schema::CURRENT_VERSION, "Created schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        let tx = self.conn.transaction()?;
        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                debug!(from_version, "Applying migration");
                tx.execute_batch(sql)?;
            }
        }
        if current < schema::CURRENT_VERSION {
            tx.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            info!(
                from = current,
                to = schema::CURRENT_VERSION,
                "Migrated schema"
            );
        }
        tx.commit()?;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (category, amount, date) VALUES (?1, ?2, ?3)",
            params![expense.category, expense.amount.to_string(), expense.date],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, %expense, "Expense added");
        Ok(id)
    }

    /// Insert all expenses in one transaction. Stored ids are always fresh;
    /// any `id` carried by the input is ignored.
    pub(crate) fn insert_expenses_batch(&mut self, expenses: &[Expense]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO expenses (category, amount, date) VALUES (?1, ?2, ?3)")?;
            for expense in expenses {
                stmt.execute(params![
                    expense.category,
                    expense.amount.to_string(),
                    expense.date
                ])?;
            }
        }
        tx.commit()?;
        info!(count = expenses.len(), "Expenses batch inserted");
        Ok(expenses.len())
    }

    /// Expenses ordered by date, then id. `month` is "YYYY-MM".
    pub(crate) fn get_expenses(&self, month: Option<&str>) -> Result<Vec<Expense>> {
        let mut sql = String::from("SELECT id, category, amount, date FROM expenses");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(m) = month {
            sql.push_str(" WHERE date LIKE ?1");
            param_values.push(Box::new(format!("{m}%")));
        }
        sql.push_str(" ORDER BY date, id");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_expense)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_expense_by_id(&self, id: i64) -> Result<Option<Expense>> {
        let result = self.conn.query_row(
            "SELECT id, category, amount, date FROM expenses WHERE id = ?1",
            params![id],
            row_to_expense,
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns false when no expense had that id.
    pub(crate) fn delete_expense(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if rows > 0 {
            info!(id, "Expense deleted");
        }
        Ok(rows > 0)
    }

    pub(crate) fn get_expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    /// Per-category totals, largest first. Summed as decimals, not in SQL,
    /// so the totals stay exact.
    pub(crate) fn get_spending_by_category(
        &self,
        month: Option<&str>,
    ) -> Result<Vec<(String, Decimal)>> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for expense in self.get_expenses(month)? {
            *totals.entry(expense.category).or_default() += expense.amount;
        }
        let mut result: Vec<(String, Decimal)> = totals.into_iter().collect();
        result.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(result)
    }

    pub(crate) fn get_total_spending(&self, month: Option<&str>) -> Result<Decimal> {
        Ok(self
            .get_expenses(month)?
            .iter()
            .map(|e| e.amount)
            .sum())
    }

    // ── Movies ────────────────────────────────────────────────

    pub(crate) fn insert_movie(&self, movie: &Movie) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO movies (name, seats) VALUES (?1, ?2)",
            params![movie.name, movie.seats],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, name = %movie.name, seats = movie.seats, "Movie added");
        Ok(id)
    }

    pub(crate) fn get_movies(&self) -> Result<Vec<Movie>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, seats FROM movies ORDER BY name, id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Movie {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                seats: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_movie_by_id(&self, id: i64) -> Result<Option<Movie>> {
        let result = self.conn.query_row(
            "SELECT id, name, seats FROM movies WHERE id = ?1",
            params![id],
            |row| {
                Ok(Movie {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    seats: row.get(2)?,
                })
            },
        );
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_booked_count(&self, movie_id: i64) -> Result<u32> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM bookings WHERE movie_id = ?1",
            params![movie_id],
            |row| row.get(0),
        )?)
    }

    // ── Bookings ──────────────────────────────────────────────

    /// Book one seat. Fails with a [`BookingError`] (inside the `anyhow`
    /// error) when the movie is unknown, sold out, or the seat is taken.
    pub(crate) fn book_seat(&mut self, movie_id: i64, seat: &str, user: &str) -> Result<i64> {
        let booking = Booking::new(movie_id, seat, user)?;

        let tx = self.conn.transaction()?;
        let (movie, seats): (String, u32) = tx
            .query_row(
                "SELECT name, seats FROM movies WHERE id = ?1",
                params![movie_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or(BookingError::MovieNotFound(movie_id))?;

        let taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE movie_id = ?1 AND seat = ?2)",
            params![movie_id, booking.seat],
            |row| row.get(0),
        )?;
        if taken {
            return Err(BookingError::SeatTaken {
                movie,
                seat: booking.seat,
            }
            .into());
        }

        let booked: u32 = tx.query_row(
            "SELECT COUNT(*) FROM bookings WHERE movie_id = ?1",
            params![movie_id],
            |row| row.get(0),
        )?;
        if booked >= seats {
            return Err(BookingError::SoldOut { movie, seats }.into());
        }

        tx.execute(
            "INSERT INTO bookings (movie_id, seat, user, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                booking.movie_id,
                booking.seat,
                booking.user,
                booking.created_at
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(id, movie_id, seat = %booking.seat, user = %booking.user, "Seat booked");
        Ok(id)
    }

    pub(crate) fn get_bookings(&self, movie_id: Option<i64>) -> Result<Vec<Booking>> {
        let (sql, param_values): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) =
            if let Some(mid) = movie_id {
                (
                    "SELECT id, movie_id, seat, user, created_at FROM bookings
                     WHERE movie_id = ?1 ORDER BY seat",
                    vec![Box::new(mid)],
                )
            } else {
                (
                    "SELECT id, movie_id, seat, user, created_at FROM bookings
                     ORDER BY movie_id, seat",
                    vec![],
                )
            };

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok(Booking {
                id: Some(row.get(0)?),
                movie_id: row.get(1)?,
                seat: row.get(2)?,
                user: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn cancel_booking(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
        if rows > 0 {
            info!(id, "Booking cancelled");
        }
        Ok(rows > 0)
    }

    // ── History ───────────────────────────────────────────────

    pub(crate) fn record_conversion(&self, conversion: &Conversion) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO conversions (input, base, value, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                conversion.input,
                conversion.base,
                conversion.value.to_string(),
                conversion.created_at,
            ],
        )?;
        debug!(input = %conversion.input, base = conversion.base, "Conversion recorded");
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent first.
    pub(crate) fn get_conversions(&self, limit: u32) -> Result<Vec<Conversion>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, input, base, value, created_at FROM conversions
             ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            let value_str: String = row.get(3)?;
            Ok(Conversion {
                id: Some(row.get(0)?),
                input: row.get(1)?,
                base: row.get(2)?,
                value: value_str.parse().unwrap_or_default(),
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn record_quiz_result(&self, result: &QuizResult) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO quiz_results (score, total, taken_at) VALUES (?1, ?2, ?3)",
            params![result.score, result.total, result.taken_at],
        )?;
        info!(score = result.score, total = result.total, "Quiz result recorded");
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent first.
    pub(crate) fn get_quiz_results(&self, limit: u32) -> Result<Vec<QuizResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, score, total, taken_at FROM quiz_results
             ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(QuizResult {
                id: Some(row.get(0)?),
                score: row.get(1)?,
                total: row.get(2)?,
                taken_at: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn row_to_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
    let amount_str: String = row.get(2)?;
    Ok(Expense {
        id: Some(row.get(0)?),
        category: row.get(1)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        date: row.get(3)?,
    })
}

#[cfg(test)]
mod tests;
