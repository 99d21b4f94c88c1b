use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use super::panel;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    render_table(f, chunks[0], app);
    render_spending(f, chunks[1], app);
}

fn period(app: &App) -> &str {
    app.current_month.as_deref().unwrap_or("all time")
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    if app.expenses.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No expenses for {}", period(app)),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :add <category> <amount> [date]",
                theme::dim_style(),
            )),
        ];
        let block = panel(" Expenses (0) ".into());
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header = Row::new(
        ["ID", "Date", "Category", "Amount"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let rows: Vec<Row> = app
        .expenses
        .iter()
        .enumerate()
        .skip(app.expense_cursor.scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            Row::new(vec![
                Cell::from(expense.id.unwrap_or(0).to_string()),
                Cell::from(expense.date.clone()),
                Cell::from(truncate(&expense.category, 28)),
                Cell::from(Span::styled(
                    format_amount(expense.amount, &app.currency),
                    theme::amount_style(),
                )),
            ])
            .style(theme::row_style(i, Some(app.expense_cursor.index)))
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(14),
        Constraint::Length(16),
    ];

    let title = format!(" Expenses ({}) - {} ", app.expenses.len(), period(app));
    let table = Table::new(rows, widths).header(header).block(panel(title));
    f.render_widget(table, area);
}

fn render_spending(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(4)])
        .split(area);

    let total = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(app.expense_total, &app.currency),
            Style::default()
                .fg(theme::PEACH)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} expenses stored", app.expense_count),
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(panel(" Total ".into()));
    f.render_widget(total, chunks[0]);

    if app.spending_by_category.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Nothing spent yet",
            theme::dim_style(),
        )))
        .centered()
        .block(panel(" By Category ".into()));
        f.render_widget(msg, chunks[1]);
        return;
    }

    let bars: Vec<Bar> = app
        .spending_by_category
        .iter()
        .take(chunks[1].height.saturating_sub(2) as usize)
        .map(|(name, amount)| {
            Bar::default()
                .value(amount.round().to_u64().unwrap_or(0))
                .label(Line::from(truncate(name, 12)))
                .text_value(format_amount(*amount, &app.currency))
                .style(Style::default().fg(theme::ACCENT))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(" By Category ".into()))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(theme::HEADER_BG).bg(theme::ACCENT));
    f.render_widget(chart, chunks[1]);
}
