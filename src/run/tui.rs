use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

use crate::config::Config;
use crate::db::Database;
use crate::ui::app::{App, EditTarget, InputMode, Screen};
use crate::ui::commands;

pub(crate) fn as_tui(db: &mut Database, config: &Config) -> Result<()> {
    let mut app = App::new(config)?;
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("TUI started");

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!(error = %format!("{e:#}"), "TUI exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab bar, status bar, command bar, table borders and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            handle_key(key, app, db)?;
        }
    }
    Ok(())
}

pub(crate) fn handle_key(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, db),
        InputMode::Command => handle_command_input(key, app, db),
        InputMode::Editing => handle_editing_input(key, app, db),
        InputMode::Confirm => handle_confirm_input(key, app, db),
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app, db)?,
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app, db)?,
        KeyCode::Char('1') => switch_screen(app, db, Screen::Expenses)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Quiz)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Converter)?,
        KeyCode::Char('4') => switch_screen(app, db, Screen::Movies)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Enter => handle_enter(app),
        KeyCode::Esc => app.status_message.clear(),
        KeyCode::Char('+') | KeyCode::Char('=') if app.screen == Screen::Converter => {
            app.adjust_base(1);
        }
        KeyCode::Char('-') if app.screen == Screen::Converter => app.adjust_base(-1),
        KeyCode::Char('r') if app.screen == Screen::Quiz => app.restart_quiz(),
        KeyCode::Char('g') => handle_goto_top(app, db)?,
        KeyCode::Char('G') => handle_goto_bottom(app, db)?,
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('H') if app.screen == Screen::Expenses => {
            commands::handle_command("prev-month", app, db)?;
        }
        KeyCode::Char('L') if app.screen == Screen::Expenses => {
            commands::handle_command("next-month", app, db)?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app, db)?;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app, db)?;
            }
        }
        KeyCode::Char('D') if app.screen == Screen::Expenses => {
            commands::handle_command("delete", app, db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let text = std::mem::take(&mut app.edit_input);
            let target = app.edit_target.take();
            app.input_mode = InputMode::Normal;
            match target {
                Some(EditTarget::QuizAnswer) => {
                    app.submit_quiz_answer(&text, db)?;
                    // keep answering until the quiz ends
                    if !app.quiz.is_finished() {
                        start_editing(app, EditTarget::QuizAnswer);
                    }
                }
                Some(EditTarget::ConverterInput) => app.convert_input(&text, db)?,
                None => {}
            }
        }
        KeyCode::Esc => {
            app.edit_input.clear();
            app.edit_target = None;
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.edit_input.pop();
        }
        KeyCode::Char(c) => {
            app.edit_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => commands::confirm_pending(app, db)?,
        _ => {
            // Any other key = cancel
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn start_editing(app: &mut App, target: EditTarget) {
    app.edit_target = Some(target);
    app.edit_input.clear();
    app.input_mode = InputMode::Editing;
}

fn handle_enter(app: &mut App) {
    match app.screen {
        Screen::Quiz if app.quiz.is_finished() => {
            app.set_status("Quiz finished. Press r to start again");
        }
        Screen::Quiz => start_editing(app, EditTarget::QuizAnswer),
        Screen::Converter => start_editing(app, EditTarget::ConverterInput),
        _ => {}
    }
}

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Expenses => app.refresh_expenses(db)?,
        Screen::Quiz => app.refresh_quiz_history(db)?,
        Screen::Converter => app.refresh_conversions(db)?,
        Screen::Movies => app.refresh_movies(db)?,
    }
    Ok(())
}

fn handle_move_down(app: &mut App, db: &mut Database) -> Result<()> {
    let page = app.visible_rows;
    match app.screen {
        Screen::Expenses => {
            app.expense_cursor.down(app.expenses.len(), page);
        }
        Screen::Movies => {
            if app.movie_cursor.down(app.movies.len(), page) {
                app.refresh_bookings(db)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_move_up(app: &mut App, db: &mut Database) -> Result<()> {
    match app.screen {
        Screen::Expenses => {
            app.expense_cursor.up();
        }
        Screen::Movies => {
            if app.movie_cursor.up() {
                app.refresh_bookings(db)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_goto_top(app: &mut App, db: &mut Database) -> Result<()> {
    match app.screen {
        Screen::Expenses => app.expense_cursor.top(),
        Screen::Movies => {
            app.movie_cursor.top();
            app.refresh_bookings(db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_goto_bottom(app: &mut App, db: &mut Database) -> Result<()> {
    let page = app.visible_rows;
    match app.screen {
        Screen::Expenses => app.expense_cursor.bottom(app.expenses.len(), page),
        Screen::Movies => {
            app.movie_cursor.bottom(app.movies.len(), page);
            app.refresh_bookings(db)?;
        }
        _ => {}
    }
    Ok(())
}
