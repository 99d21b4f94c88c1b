use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use super::panel;
use crate::quiz::Outcome;
use crate::ui::app::App;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Question
            Constraint::Length(3), // Progress
            Constraint::Min(3),    // Answers so far
        ])
        .split(columns[0]);

    render_question(f, left[0], app);
    render_progress(f, left[1], app);
    render_log(f, left[2], app);
    render_history(f, columns[1], app);
}

fn render_question(f: &mut Frame, area: Rect, app: &App) {
    let quiz = &app.quiz;
    let lines = match quiz.current() {
        Some(question) => vec![
            Line::from(Span::styled(
                format!("Question {} of {}", quiz.question_number(), quiz.total()),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("{question} = ?"),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Press Enter to answer", theme::dim_style())),
        ],
        None => {
            let result = quiz.result();
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("Quiz Over! Your Score: {result}"),
                    Style::default()
                        .fg(theme::YELLOW)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled("Press r for a new quiz", theme::dim_style())),
            ]
        }
    };

    f.render_widget(
        Paragraph::new(lines).centered().block(panel(" Math Quiz ".into())),
        area,
    );
}

fn render_progress(f: &mut Frame, area: Rect, app: &App) {
    let quiz = &app.quiz;
    let ratio = if quiz.total() == 0 {
        0.0
    } else {
        quiz.answered() as f64 / quiz.total() as f64
    };
    let gauge = Gauge::default()
        .block(panel(" Score ".into()))
        .gauge_style(Style::default().fg(theme::GREEN).bg(theme::SURFACE))
        .label(format!(
            "{} correct, {} answered of {}",
            quiz.score(),
            quiz.answered(),
            quiz.total()
        ))
        .ratio(ratio.clamp(0.0, 1.0));
    f.render_widget(gauge, area);
}

fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .quiz_log
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry.outcome {
            Outcome::Correct => Line::from(vec![
                Span::styled(format!(" {:>2}. ", i + 1), theme::dim_style()),
                Span::styled(
                    format!("{} = {}", entry.question, entry.given),
                    theme::normal_style(),
                ),
                Span::styled("  correct", theme::correct_style()),
            ]),
            Outcome::Wrong { expected } => Line::from(vec![
                Span::styled(format!(" {:>2}. ", i + 1), theme::dim_style()),
                Span::styled(
                    format!("{} = {}", entry.question, entry.given),
                    theme::normal_style(),
                ),
                Span::styled(format!("  wrong, answer {expected}"), theme::wrong_style()),
            ]),
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines).block(panel(" Answers ".into())),
        area,
    );
}

fn render_history(f: &mut Frame, area: Rect, app: &App) {
    if app.quiz_history.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No quizzes finished yet",
            theme::dim_style(),
        )))
        .centered()
        .block(panel(" Recent Results ".into()));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Taken", "Score"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );
    let rows: Vec<Row> = app
        .quiz_history
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let taken = r.taken_at.get(..16).unwrap_or(&r.taken_at).replace('T', " ");
            Row::new(vec![Cell::from(taken), Cell::from(r.to_string())])
                .style(theme::row_style(i, None))
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(16), Constraint::Length(7)])
        .header(header)
        .block(panel(" Recent Results ".into()));
    f.render_widget(table, area);
}
