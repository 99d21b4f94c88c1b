use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::error::BookingError;
use crate::export;
use crate::models::{parse_amount, today, Expense, Movie};
use crate::numeral;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Kitbag", cmd_quit, r);
    register_command!("quit", "Quit Kitbag", cmd_quit, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("z", "Go to Quiz", cmd_quiz, r);
    register_command!("quiz", "Go to Quiz", cmd_quiz, r);
    register_command!("c", "Go to Converter", cmd_converter, r);
    register_command!("converter", "Go to Converter", cmd_converter, r);
    register_command!("mv", "Go to Movies", cmd_movies, r);
    register_command!("movies", "Go to Movies", cmd_movies, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add Groceries 12.50 2024-01-05)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Add expense (e.g. :a Groceries 12.50)",
        cmd_add,
        r
    );
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!("month", "Set month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "report",
        "Write spreadsheet report (e.g. :report ~/Expense_Report.xlsx)",
        cmd_report,
        r
    );
    register_command!(
        "export",
        "Export expenses to JSON (e.g. :export ~/expenses.json)",
        cmd_export,
        r
    );
    register_command!(
        "export-csv",
        "Export expenses to CSV (e.g. :export-csv ~/expenses.csv)",
        cmd_export_csv,
        r
    );
    register_command!(
        "import",
        "Import expenses from JSON (e.g. :import ~/expenses.json)",
        cmd_import,
        r
    );
    register_command!(
        "convert",
        "Convert digits in the current base (e.g. :convert 1011)",
        cmd_convert,
        r
    );
    register_command!("base", "Set converter base (e.g. :base 16)", cmd_base, r);
    register_command!("restart", "Start a new quiz", cmd_restart, r);
    register_command!(
        "movie",
        "Add movie (e.g. :movie 40 The Matrix)",
        cmd_movie,
        r
    );
    register_command!(
        "book",
        "Book a seat for the selected movie (e.g. :book A7 Priya)",
        cmd_book,
        r
    );
    register_command!(
        "cancel",
        "Cancel a booking (e.g. :cancel 3)",
        cmd_cancel,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 2) // skip short aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.refresh_expenses(db)?;
    Ok(())
}

fn cmd_quiz(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Quiz;
    app.refresh_quiz_history(db)?;
    Ok(())
}

fn cmd_converter(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Converter;
    app.refresh_conversions(db)?;
    Ok(())
}

fn cmd_movies(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Movies;
    app.refresh_movies(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 2 {
        app.set_status("Usage: :add <category> <amount> [YYYY-MM-DD]");
        return Ok(());
    }

    // A trailing date is optional; the amount sits right before it.
    let last = parts[parts.len() - 1];
    let (amount_str, date, category_end) =
        if parts.len() >= 3 && last.matches('-').count() == 2 {
            (parts[parts.len() - 2], last.to_string(), parts.len() - 2)
        } else {
            (last, today(), parts.len() - 1)
        };
    let category = parts[..category_end].join(" ");

    let result = parse_amount(amount_str)
        .and_then(|amount| Expense::new(&category, amount, &date));
    let expense = match result {
        Ok(e) => e,
        Err(e) => {
            app.set_status(format!("Error: {e}"));
            return Ok(());
        }
    };

    let id = db.insert_expense(&expense)?;
    app.screen = Screen::Expenses;
    app.refresh_expenses(db)?;
    if let Some(pos) = app.expenses.iter().position(|e| e.id == Some(id)) {
        app.expense_cursor.select(pos, app.visible_rows);
    }
    let hidden = app
        .current_month
        .as_deref()
        .is_some_and(|m| m != expense.month());
    app.set_status(format!(
        "Added: {} {} on {}{}",
        expense.category,
        super::util::format_amount(expense.amount, &app.currency),
        expense.date,
        if hidden { " (outside the shown month)" } else { "" }
    ));
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(expense) = app.selected_expense() else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let Some(id) = expense.id else {
        return Ok(());
    };
    let category = expense.category.clone();
    app.confirm_message = format!("Delete expense {id} ({category})?");
    app.pending_action = Some(PendingAction::DeleteExpense { id, category });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.current_month = None;
        app.refresh_expenses(db)?;
        app.set_status("Showing all time");
        return Ok(());
    }

    // Accept "2024-01", "2024-1", "01", "1"
    let month = if args.len() <= 2 {
        let year = app.current_month.as_ref().map_or_else(
            || chrono::Local::now().format("%Y").to_string(),
            |m| m[..4].to_string(),
        );
        format!("{year}-{args:0>2}")
    } else {
        match args.split_once('-') {
            Some((y, m)) if m.len() == 1 => format!("{y}-0{m}"),
            _ => args.to_string(),
        }
    };

    if month.len() == 7
        && chrono::NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_ok()
    {
        app.set_status(format!("Switched to month: {month}"));
        app.current_month = Some(month);
        app.expense_cursor.top();
        app.refresh_expenses(db)?;
    } else {
        app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)");
    }

    Ok(())
}

fn shift_month(app: &mut App, db: &mut Database, forward: bool) -> anyhow::Result<()> {
    let base = app
        .current_month
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m").to_string());
    let first = chrono::NaiveDate::parse_from_str(&format!("{base}-01"), "%Y-%m-%d")?;
    let shifted = if forward {
        first.checked_add_months(chrono::Months::new(1))
    } else {
        first.checked_sub_months(chrono::Months::new(1))
    };
    if let Some(date) = shifted {
        let month = date.format("%Y-%m").to_string();
        cmd_month(&month, app, db)?;
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    shift_month(app, db, true)
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    shift_month(app, db, false)
}

fn target_path(args: &str, default: &str) -> String {
    if args.is_empty() {
        export::expand_home(default)
    } else {
        export::expand_home(args)
    }
}

fn cmd_report(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = target_path(args, export::DEFAULT_REPORT_PATH);
    let expenses = db.get_expenses(None)?;
    match export::write_expense_report(Path::new(&path), &expenses) {
        Ok(count) => app.set_status(format!("Report with {count} expenses written to {path}")),
        Err(e) => app.set_status(format!("Report failed: {e:#}")),
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = target_path(args, export::DEFAULT_JSON_PATH);
    let expenses = db.get_expenses(None)?;
    match export::write_expenses_json(Path::new(&path), &expenses) {
        Ok(count) => app.set_status(format!("Exported {count} expenses to {path}")),
        Err(e) => app.set_status(format!("Export failed: {e:#}")),
    }
    Ok(())
}

fn cmd_export_csv(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = target_path(args, export::DEFAULT_CSV_PATH);
    let expenses = db.get_expenses(None)?;
    match export::write_expenses_csv(Path::new(&path), &expenses) {
        Ok(count) => app.set_status(format!("Exported {count} expenses to {path}")),
        Err(e) => app.set_status(format!("Export failed: {e:#}")),
    }
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = target_path(args, export::DEFAULT_JSON_PATH);
    let expenses = match export::read_expenses_json(Path::new(&path)) {
        Ok(e) => e,
        Err(e) => {
            app.set_status(format!("Import failed: {e:#}"));
            return Ok(());
        }
    };
    let count = db.insert_expenses_batch(&expenses)?;
    app.screen = Screen::Expenses;
    app.refresh_expenses(db)?;
    app.set_status(format!("Imported {count} expenses from {path}"));
    Ok(())
}

fn cmd_convert(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Converter;
    if args.is_empty() {
        app.edit_target = Some(super::app::EditTarget::ConverterInput);
        app.edit_input.clear();
        app.input_mode = InputMode::Editing;
        return Ok(());
    }
    app.convert_input(args, db)
}

fn cmd_base(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match args.parse::<u32>() {
        Ok(base) if (numeral::MIN_BASE..=numeral::MAX_BASE).contains(&base) => {
            app.screen = Screen::Converter;
            app.set_base(base);
        }
        _ => app.set_status(format!(
            "Usage: :base <{}-{}>",
            numeral::MIN_BASE,
            numeral::MAX_BASE
        )),
    }
    Ok(())
}

fn cmd_restart(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Quiz;
    app.restart_quiz();
    Ok(())
}

fn cmd_movie(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some((seats_str, name)) = args.split_once(' ') else {
        app.set_status("Usage: :movie <seats> <name>");
        return Ok(());
    };
    let seats = match seats_str.parse::<u32>() {
        Ok(s) => s,
        Err(_) => {
            app.set_status(format!("Invalid seat count: {seats_str}"));
            return Ok(());
        }
    };
    let movie = match Movie::new(name, seats) {
        Ok(m) => m,
        Err(e) => {
            app.set_status(format!("Error: {e}"));
            return Ok(());
        }
    };

    let id = db.insert_movie(&movie)?;
    app.screen = Screen::Movies;
    app.refresh_movies(db)?;
    if let Some(pos) = app.movies.iter().position(|m| m.id == Some(id)) {
        app.movie_cursor.select(pos, app.visible_rows);
        app.refresh_bookings(db)?;
    }
    app.set_status(format!("Added movie: {} ({seats} seats)", movie.name));
    Ok(())
}

fn cmd_book(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some((seat, user)) = args.split_once(' ') else {
        app.set_status("Usage: :book <seat> <user>");
        return Ok(());
    };
    let Some(movie) = app.selected_movie().cloned() else {
        app.set_status("No movie selected. Add one with :movie <seats> <name>");
        return Ok(());
    };
    let movie_id = movie.id.unwrap_or(0);

    match db.book_seat(movie_id, seat, user.trim()) {
        Ok(_) => {
            app.refresh_movies(db)?;
            app.set_status(format!(
                "Booked seat {} for {} ({})",
                crate::models::normalize_seat(seat),
                user.trim(),
                movie.name
            ));
        }
        Err(e) => match e.downcast_ref::<BookingError>() {
            Some(booking_err) => app.set_status(format!("Booking failed: {booking_err}")),
            None => return Err(e),
        },
    }
    Ok(())
}

fn cmd_cancel(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Ok(id) = args.parse::<i64>() else {
        app.set_status("Usage: :cancel <booking-id>");
        return Ok(());
    };
    let seat = app
        .bookings
        .iter()
        .find(|b| b.id == Some(id))
        .map(|b| b.seat.clone())
        .unwrap_or_else(|| "?".into());
    app.confirm_message = format!("Cancel booking {id} (seat {seat})?");
    app.pending_action = Some(PendingAction::CancelBooking { id, seat });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

/// Run a confirmed pending action.
pub(crate) fn confirm_pending(app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if let Some(action) = app.pending_action.take() {
        match action {
            PendingAction::DeleteExpense { id, category } => {
                if db.delete_expense(id)? {
                    app.refresh_expenses(db)?;
                    app.set_status(format!("Deleted expense {id} ({category})"));
                } else {
                    app.set_status("Expense not found");
                }
            }
            PendingAction::CancelBooking { id, seat } => {
                if db.cancel_booking(id)? {
                    app.refresh_movies(db)?;
                    app.set_status(format!("Cancelled booking {id} (seat {seat})"));
                } else {
                    app.set_status(format!("Booking {id} not found"));
                }
            }
        }
    }
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    Ok(())
}
