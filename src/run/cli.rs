use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::warn;

use crate::config::Config;
use crate::db::Database;
use crate::error::{BookingError, QuizError};
use crate::export;
use crate::models::{parse_amount, today, Conversion, Expense, Movie, QuizResult};
use crate::numeral;
use crate::quiz::{Outcome, Quiz, QuizConfig};
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_command(&args[1..], db, config, &mut stdin.lock(), &mut stdout.lock())
}

/// Dispatch one command. `args[0]` is the command name.
pub(crate) fn run_command<R: BufRead, W: Write>(
    args: &[String],
    db: &mut Database,
    config: &Config,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage(out)?;
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "convert" | "c" => cli_convert(rest, db, input, out),
        "encode" => cli_encode(rest, out),
        "quiz" | "q" => cli_quiz(rest, db, config, input, out),
        "add" | "a" => cli_add(rest, db, config, out),
        "list" | "ls" => cli_list(rest, db, config, out),
        "delete" | "rm" => cli_delete(rest, db, config, out),
        "summary" | "s" => cli_summary(rest, db, config, out),
        "report" => cli_report(rest, db, out),
        "export" => cli_export_json(rest, db, out),
        "export-csv" => cli_export_csv(rest, db, out),
        "import" => cli_import(rest, db, config, out),
        "movies" => cli_movies(db, out),
        "movie-add" => cli_movie_add(rest, db, out),
        "book" => cli_book(rest, db, out),
        "bookings" => cli_bookings(rest, db, out),
        "cancel" => cli_cancel(rest, db, out),
        "history" => cli_history(db, out),
        "--help" | "-h" | "help" => print_usage(out),
        "--version" | "-V" | "version" => {
            writeln!(out, "kitbag {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage<W: Write>(out: &mut W) -> Result<()> {
    let usage = "\
Kitbag - expense tracker, math quiz, numeral converter and movie booking

Usage: kitbag [command]

Commands:
  (none)                          Launch interactive TUI
  convert [digits]                Convert a number to decimal (prompts if omitted)
    --base <2-36>                 Base of the input (default: 2)
  encode <number>                 Convert a decimal number to another base
    --base <2-36>                 Target base (default: 2)
  quiz                            Take a math quiz in the console
    --questions <n>               Number of questions (default: 5)
  add <category> <amount> [date]  Add an expense (date: YYYY-MM-DD, default today)
  list                            List expenses
    --month <YYYY-MM>             Only one month
  delete <id>                     Delete an expense
  summary [YYYY-MM]               Spending by category
  report [path.xlsx]              Write a spreadsheet report
  export [path.json]              Export expenses to JSON
  export-csv [path.csv]           Export expenses to CSV
  import [path.json]              Import expenses from JSON
  movies                          List movies
  movie-add <seats> <name>        Add a movie showing
  book <movie-id> <seat> <user>   Book a seat
  bookings [movie-id]             List bookings
  cancel <booking-id>             Cancel a booking
  history                         Recent conversions and quiz scores
  --help, -h                      Show this help
  --version, -V                   Show version";
    writeln!(out, "{usage}")?;
    Ok(())
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut result = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
        } else if arg.starts_with("--") {
            skip_next = true;
        } else {
            result.push(arg.as_str());
        }
    }
    result
}

/// `None` when no `--base` flag was given.
fn parse_base(args: &[String]) -> Result<Option<u32>> {
    flag_value(args, "--base")
        .map(|b| {
            b.parse()
                .with_context(|| format!("Invalid --base value: {b}"))
        })
        .transpose()
}

fn parse_id(arg: Option<&str>, usage: &str) -> Result<i64> {
    let raw = arg.ok_or_else(|| anyhow::anyhow!("Usage: {usage}"))?;
    raw.parse()
        .with_context(|| format!("Invalid id: {raw}"))
}

fn path_or_default(arg: Option<&str>, default: &str) -> String {
    export::expand_home(arg.unwrap_or(default))
}

fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("No input");
    }
    Ok(line.trim().to_string())
}

fn expense_line(expense: &Expense, currency: &str) -> String {
    format!(
        "{}. {} | {} | {}",
        expense.id.unwrap_or(0),
        expense.category,
        format_amount(expense.amount, currency),
        expense.date
    )
}

// ── Converter ────────────────────────────────────────────────

fn cli_convert<R: BufRead, W: Write>(
    args: &[String],
    db: &mut Database,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let base = parse_base(args)?;
    let digits = match positionals(args).first() {
        Some(d) => d.to_string(),
        None => prompt_line(
            input,
            out,
            &format!("Enter a {} number: ", numeral::base_name(base.unwrap_or(2))),
        )?,
    };

    let value = match base {
        Some(b) => numeral::parse_positional(&digits, b)?,
        None => numeral::binary_to_decimal(&digits)?,
    };
    db.record_conversion(&Conversion::new(&digits, base.unwrap_or(2), value))?;
    writeln!(out, "The decimal equivalent of {digits} is {value}")?;
    Ok(())
}

fn cli_encode<W: Write>(args: &[String], out: &mut W) -> Result<()> {
    let base = parse_base(args)?.unwrap_or(2);
    let raw = positionals(args)
        .first()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Usage: kitbag encode <number> [--base N]"))?;
    let value: u64 = raw
        .parse()
        .with_context(|| format!("Not a non-negative decimal number: {raw}"))?;
    let digits = numeral::format_positional(value, base)?;
    writeln!(out, "{value} in {} is {digits}", numeral::base_name(base))?;
    Ok(())
}

// ── Quiz ─────────────────────────────────────────────────────

fn cli_quiz<R: BufRead, W: Write>(
    args: &[String],
    db: &mut Database,
    config: &Config,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let questions = match flag_value(args, "--questions") {
        Some(n) => n
            .parse()
            .with_context(|| format!("Invalid --questions value: {n}"))?,
        None => config.quiz.questions,
    };
    let mut quiz = Quiz::new(QuizConfig {
        questions,
        ..config.quiz
    })?;

    let result = run_quiz(&mut quiz, input, out)?;
    if result.total > 0 {
        db.record_quiz_result(&result)?;
    }
    Ok(())
}

/// Ask questions until the quiz ends or input runs out.
pub(crate) fn run_quiz<R: BufRead, W: Write>(
    quiz: &mut Quiz,
    input: &mut R,
    out: &mut W,
) -> Result<QuizResult> {
    writeln!(out, "Welcome to the math quiz! {} questions.", quiz.total())?;
    let mut line = String::new();

    while let Some(question) = quiz.current().copied() {
        write!(out, "Question {}: {question} = ? ", quiz.question_number())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            writeln!(out, "No more input, ending the quiz early.")?;
            break;
        }

        match quiz.submit_text(&line) {
            Ok(Outcome::Correct) => writeln!(out, "Correct!")?,
            Ok(Outcome::Wrong { expected }) => {
                writeln!(out, "Wrong! The correct answer is {expected}")?
            }
            Err(QuizError::NotANumber(text)) => {
                warn!(input = %text, "Quiz answer is not a number");
                writeln!(out, "Please enter a valid number!")?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let result = quiz.result();
    writeln!(out, "Quiz Over! Your Score: {result}")?;
    Ok(result)
}

// ── Expenses ─────────────────────────────────────────────────

fn cli_add<W: Write>(args: &[String], db: &mut Database, config: &Config, out: &mut W) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: kitbag add <category> <amount> [YYYY-MM-DD]");
    }
    let amount = parse_amount(pos[1])?;
    let date = pos.get(2).map(|d| d.to_string()).unwrap_or_else(today);
    let expense = Expense::new(pos[0], amount, &date)?;
    let id = db.insert_expense(&expense)?;
    writeln!(
        out,
        "Expense added successfully: {}",
        expense_line(
            &Expense {
                id: Some(id),
                ..expense
            },
            &config.currency
        )
    )?;
    Ok(())
}

fn cli_list<W: Write>(args: &[String], db: &mut Database, config: &Config, out: &mut W) -> Result<()> {
    let month = flag_value(args, "--month");
    let expenses = db.get_expenses(month)?;
    if expenses.is_empty() {
        writeln!(out, "No expenses")?;
        return Ok(());
    }

    writeln!(out, "===== Expense List =====")?;
    for expense in &expenses {
        writeln!(out, "{}", expense_line(expense, &config.currency))?;
    }
    Ok(())
}

fn cli_delete<W: Write>(
    args: &[String],
    db: &mut Database,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "kitbag delete <id>")?;
    match db.get_expense_by_id(id)? {
        Some(expense) => {
            db.delete_expense(id)?;
            writeln!(out, "Expense deleted successfully.")?;
            writeln!(out, "  {}", expense_line(&expense, &config.currency))?;
        }
        None => writeln!(out, "Expense not found.")?,
    }
    Ok(())
}

fn cli_summary<W: Write>(
    args: &[String],
    db: &mut Database,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let month = positionals(args).first().copied();
    let total = db.get_total_spending(month)?;
    let spending = db.get_spending_by_category(month)?;

    writeln!(out, "Kitbag - {}", month.unwrap_or("all time"))?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Total:    {}", format_amount(total, &config.currency))?;
    writeln!(out, "  Expenses: {}", db.get_expense_count()?)?;

    if !spending.is_empty() {
        writeln!(out)?;
        writeln!(out, "Spending by Category:")?;
        for (name, amount) in &spending {
            writeln!(out, "  {name:<24} {}", format_amount(*amount, &config.currency))?;
        }
    }
    Ok(())
}

fn cli_report<W: Write>(args: &[String], db: &mut Database, out: &mut W) -> Result<()> {
    let path = path_or_default(positionals(args).first().copied(), export::DEFAULT_REPORT_PATH);
    let count = export::write_expense_report(Path::new(&path), &db.get_expenses(None)?)?;
    writeln!(out, "Spreadsheet report with {count} expenses written to: {path}")?;
    Ok(())
}

fn cli_export_json<W: Write>(args: &[String], db: &mut Database, out: &mut W) -> Result<()> {
    let path = path_or_default(positionals(args).first().copied(), export::DEFAULT_JSON_PATH);
    let count = export::write_expenses_json(Path::new(&path), &db.get_expenses(None)?)?;
    writeln!(out, "Exported {count} expenses to JSON file: {path}")?;
    Ok(())
}

fn cli_export_csv<W: Write>(args: &[String], db: &mut Database, out: &mut W) -> Result<()> {
    let path = path_or_default(positionals(args).first().copied(), export::DEFAULT_CSV_PATH);
    let count = export::write_expenses_csv(Path::new(&path), &db.get_expenses(None)?)?;
    writeln!(out, "Exported {count} expenses to CSV file: {path}")?;
    Ok(())
}

fn cli_import<W: Write>(
    args: &[String],
    db: &mut Database,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let path = path_or_default(positionals(args).first().copied(), export::DEFAULT_JSON_PATH);
    let expenses = export::read_expenses_json(Path::new(&path))?;
    let count = db.insert_expenses_batch(&expenses)?;
    writeln!(out, "Imported {count} expenses from {path}:")?;
    for expense in &expenses {
        writeln!(
            out,
            "  {} | {} | {}",
            expense.category,
            format_amount(expense.amount, &config.currency),
            expense.date
        )?;
    }
    Ok(())
}

// ── Movies ───────────────────────────────────────────────────

fn cli_movies<W: Write>(db: &mut Database, out: &mut W) -> Result<()> {
    let movies = db.get_movies()?;
    if movies.is_empty() {
        writeln!(out, "No movies")?;
        return Ok(());
    }

    writeln!(out, "{:<4} {:<30} {:>6} {:>7}", "ID", "Name", "Seats", "Booked")?;
    writeln!(out, "{}", "─".repeat(50))?;
    for movie in &movies {
        let id = movie.id.unwrap_or(0);
        writeln!(
            out,
            "{:<4} {:<30} {:>6} {:>7}",
            id,
            movie.name,
            movie.seats,
            db.get_booked_count(id)?
        )?;
    }
    Ok(())
}

fn cli_movie_add<W: Write>(args: &[String], db: &mut Database, out: &mut W) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: kitbag movie-add <seats> <name>");
    }
    let seats: u32 = args[0]
        .parse()
        .with_context(|| format!("Invalid seat count: {}", args[0]))?;
    let movie = Movie::new(&args[1..].join(" "), seats)?;
    let id = db.insert_movie(&movie)?;
    writeln!(out, "Added movie {id}: {} ({} seats)", movie.name, movie.seats)?;
    Ok(())
}

fn cli_book<W: Write>(args: &[String], db: &mut Database, out: &mut W) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: kitbag book <movie-id> <seat> <user>");
    }
    let movie_id = parse_id(Some(&args[0]), "kitbag book <movie-id> <seat> <user>")?;
    let user = args[2..].join(" ");
    let id = db.book_seat(movie_id, &args[1], &user)?;
    writeln!(
        out,
        "Booked seat {} for {user} (booking {id})",
        crate::models::normalize_seat(&args[1])
    )?;
    Ok(())
}

fn cli_bookings<W: Write>(args: &[String], db: &mut Database, out: &mut W) -> Result<()> {
    let movie_id = match args.first() {
        Some(raw) => Some(parse_id(Some(raw), "kitbag bookings [movie-id]")?),
        None => None,
    };
    if let Some(id) = movie_id {
        db.get_movie_by_id(id)?
            .ok_or(BookingError::MovieNotFound(id))?;
    }
    let bookings = db.get_bookings(movie_id)?;
    if bookings.is_empty() {
        writeln!(out, "No bookings")?;
        return Ok(());
    }

    let movies = db.get_movies()?;
    writeln!(out, "{:<4} {:<24} {:<6} User", "ID", "Movie", "Seat")?;
    writeln!(out, "{}", "─".repeat(50))?;
    for booking in &bookings {
        let movie = Movie::find_by_id(&movies, booking.movie_id)
            .map(|m| m.name.as_str())
            .unwrap_or("?");
        writeln!(
            out,
            "{:<4} {:<24} {:<6} {}",
            booking.id.unwrap_or(0),
            movie,
            booking.seat,
            booking.user
        )?;
    }
    Ok(())
}

fn cli_cancel<W: Write>(args: &[String], db: &mut Database, out: &mut W) -> Result<()> {
    let id = parse_id(args.first().map(|s| s.as_str()), "kitbag cancel <booking-id>")?;
    if db.cancel_booking(id)? {
        writeln!(out, "Booking {id} cancelled.")?;
    } else {
        writeln!(out, "Booking not found.")?;
    }
    Ok(())
}

// ── History ──────────────────────────────────────────────────

fn cli_history<W: Write>(db: &mut Database, out: &mut W) -> Result<()> {
    writeln!(out, "Recent conversions:")?;
    let conversions = db.get_conversions(10)?;
    if conversions.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for c in &conversions {
        writeln!(out, "  {:<20} base {:<3} = {}", c.input, c.base, c.value)?;
    }

    writeln!(out)?;
    writeln!(out, "Recent quiz scores:")?;
    let results = db.get_quiz_results(10)?;
    if results.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for r in &results {
        let date = r.taken_at.get(..10).unwrap_or(&r.taken_at);
        writeln!(out, "  {date}  {r}")?;
    }
    Ok(())
}
