use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::Config;
use crate::db::Database;
use crate::error::QuizError;
use crate::models::*;
use crate::numeral;
use crate::quiz::{Outcome, Question, Quiz};
use crate::ui::util::ListCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Expenses,
    Quiz,
    Converter,
    Movies,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Expenses, Self::Quiz, Self::Converter, Self::Movies]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expenses => write!(f, "Expenses"),
            Self::Quiz => write!(f, "Quiz"),
            Self::Converter => write!(f, "Converter"),
            Self::Movies => write!(f, "Movies"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// What the edit prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditTarget {
    QuizAnswer,
    ConverterInput,
}

impl EditTarget {
    pub(crate) fn prompt(&self) -> &'static str {
        match self {
            Self::QuizAnswer => "answer> ",
            Self::ConverterInput => "digits> ",
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, category: String },
    CancelBooking { id: i64, seat: String },
}

/// One answered quiz question, kept for the feedback panel.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AnsweredQuestion {
    pub(crate) question: Question,
    pub(crate) given: i64,
    pub(crate) outcome: Outcome,
}

/// Last conversion attempt shown under the converter prompt.
#[derive(Debug, Clone)]
pub(crate) enum ConversionOutcome {
    Converted { input: String, value: u64 },
    Rejected { input: String, reason: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) edit_input: String,
    pub(crate) edit_target: Option<EditTarget>,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) currency: String,
    /// `None` shows all time.
    pub(crate) current_month: Option<String>,

    // Expenses
    pub(crate) expenses: Vec<Expense>,
    pub(crate) expense_cursor: ListCursor,
    pub(crate) expense_total: Decimal,
    pub(crate) expense_count: i64,
    pub(crate) spending_by_category: Vec<(String, Decimal)>,

    // Quiz
    pub(crate) quiz: Quiz,
    pub(crate) quiz_log: Vec<AnsweredQuestion>,
    pub(crate) quiz_saved: bool,
    pub(crate) quiz_history: Vec<QuizResult>,

    // Converter
    pub(crate) converter_base: u32,
    pub(crate) last_conversion: Option<ConversionOutcome>,
    pub(crate) conversions: Vec<Conversion>,

    // Movies
    pub(crate) movies: Vec<Movie>,
    pub(crate) booked_counts: Vec<u32>,
    pub(crate) movie_cursor: ListCursor,
    pub(crate) bookings: Vec<Booking>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            running: true,
            screen: Screen::Expenses,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            edit_input: String::new(),
            edit_target: None,
            status_message: String::new(),
            show_help: false,
            currency: config.currency.clone(),
            current_month: None,

            expenses: Vec::new(),
            expense_cursor: ListCursor::default(),
            expense_total: Decimal::ZERO,
            expense_count: 0,
            spending_by_category: Vec::new(),

            quiz: Quiz::new(config.quiz)?,
            quiz_log: Vec::new(),
            quiz_saved: false,
            quiz_history: Vec::new(),

            converter_base: 2,
            last_conversion: None,
            conversions: Vec::new(),

            movies: Vec::new(),
            booked_counts: Vec::new(),
            movie_cursor: ListCursor::default(),
            bookings: Vec::new(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        })
    }

    pub(crate) fn refresh_expenses(&mut self, db: &Database) -> Result<()> {
        let month = self.current_month.as_deref();
        self.expenses = db.get_expenses(month)?;
        self.expense_total = db.get_total_spending(month)?;
        self.spending_by_category = db.get_spending_by_category(month)?;
        self.expense_count = db.get_expense_count()?;
        self.expense_cursor.clamp(self.expenses.len());
        Ok(())
    }

    pub(crate) fn refresh_quiz_history(&mut self, db: &Database) -> Result<()> {
        self.quiz_history = db.get_quiz_results(10)?;
        Ok(())
    }

    pub(crate) fn refresh_conversions(&mut self, db: &Database) -> Result<()> {
        self.conversions = db.get_conversions(20)?;
        Ok(())
    }

    pub(crate) fn refresh_movies(&mut self, db: &Database) -> Result<()> {
        self.movies = db.get_movies()?;
        self.booked_counts = self
            .movies
            .iter()
            .map(|m| db.get_booked_count(m.id.unwrap_or(0)))
            .collect::<Result<_>>()?;
        self.movie_cursor.clamp(self.movies.len());
        self.refresh_bookings(db)
    }

    pub(crate) fn refresh_bookings(&mut self, db: &Database) -> Result<()> {
        self.bookings = match self.selected_movie().and_then(|m| m.id) {
            Some(id) => db.get_bookings(Some(id))?,
            None => Vec::new(),
        };
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_expenses(db)?;
        self.refresh_quiz_history(db)?;
        self.refresh_conversions(db)?;
        self.refresh_movies(db)?;
        Ok(())
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        self.expenses.get(self.expense_cursor.index)
    }

    pub(crate) fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.movie_cursor.index)
    }

    // ── Quiz ─────────────────────────────────────────────────

    /// Submit typed text as the answer to the current question.
    /// Saves the result once the last question is answered.
    pub(crate) fn submit_quiz_answer(&mut self, text: &str, db: &Database) -> Result<()> {
        let Some(question) = self.quiz.current().copied() else {
            self.set_status("Quiz finished. Press r to start again");
            return Ok(());
        };

        match self.quiz.submit_text(text) {
            Ok(outcome) => {
                let given = text.trim().parse().unwrap_or_default();
                self.quiz_log.push(AnsweredQuestion {
                    question,
                    given,
                    outcome,
                });
                match outcome {
                    Outcome::Correct => self.set_status("Correct!"),
                    Outcome::Wrong { expected } => {
                        self.set_status(format!("Wrong! The correct answer is {expected}"))
                    }
                }
            }
            Err(QuizError::NotANumber(_)) => {
                self.set_status("Please enter a valid number!");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        if self.quiz.is_finished() && !self.quiz_saved {
            let result = self.quiz.result();
            db.record_quiz_result(&result)?;
            self.quiz_saved = true;
            self.refresh_quiz_history(db)?;
            info!(score = result.score, total = result.total, "Quiz finished");
            self.set_status(format!("Quiz Over! Your Score: {result}"));
        }
        Ok(())
    }

    pub(crate) fn restart_quiz(&mut self) {
        self.quiz.restart();
        self.quiz_log.clear();
        self.quiz_saved = false;
        self.set_status("New quiz started");
    }

    // ── Converter ────────────────────────────────────────────

    /// Convert `text` in the current base. Successful conversions are stored.
    pub(crate) fn convert_input(&mut self, text: &str, db: &Database) -> Result<()> {
        let input = text.trim().to_string();
        match numeral::parse_positional(&input, self.converter_base) {
            Ok(value) => {
                db.record_conversion(&Conversion::new(&input, self.converter_base, value))?;
                self.refresh_conversions(db)?;
                self.set_status(format!("The decimal equivalent of {input} is {value}"));
                self.last_conversion = Some(ConversionOutcome::Converted { input, value });
            }
            Err(e) => {
                debug!(input = %input, error = %e, "Conversion rejected");
                self.set_status(format!("Invalid input: {e}"));
                self.last_conversion = Some(ConversionOutcome::Rejected {
                    input,
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Move the converter base by `delta`, clamped to the supported range.
    pub(crate) fn adjust_base(&mut self, delta: i32) {
        let next = (self.converter_base as i32 + delta)
            .clamp(numeral::MIN_BASE as i32, numeral::MAX_BASE as i32);
        self.set_base(next as u32);
    }

    pub(crate) fn set_base(&mut self, base: u32) {
        self.converter_base = base;
        self.last_conversion = None;
        self.set_status(format!("Converting from {}", numeral::base_name(base)));
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
