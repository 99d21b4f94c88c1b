use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::panel;
use crate::numeral;
use crate::ui::app::{App, ConversionOutcome};
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(4)])
        .split(area);

    render_result(f, chunks[0], app);
    render_history(f, chunks[1], app);
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let base_line = Line::from(vec![
        Span::styled("Input base: ", theme::dim_style()),
        Span::styled(
            format!("{} ({})", app.converter_base, numeral::base_name(app.converter_base)),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   +/- to change", theme::dim_style()),
    ]);

    let result_line = match &app.last_conversion {
        Some(ConversionOutcome::Converted { input, value }) => Line::from(vec![
            Span::styled(
                format!("The decimal equivalent of {input} is "),
                theme::normal_style(),
            ),
            Span::styled(
                value.to_string(),
                Style::default()
                    .fg(theme::GREEN)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Some(ConversionOutcome::Rejected { input, reason }) => Line::from(Span::styled(
            format!("'{input}': {reason}"),
            theme::wrong_style(),
        )),
        None => Line::from(Span::styled(
            format!("Press Enter to type a {} number", numeral::base_name(app.converter_base)),
            theme::dim_style(),
        )),
    };

    let lines = vec![
        Line::from(""),
        base_line,
        Line::from(""),
        result_line,
    ];
    f.render_widget(
        Paragraph::new(lines).centered().block(panel(" Number Converter ".into())),
        area,
    );
}

fn render_history(f: &mut Frame, area: Rect, app: &App) {
    if app.conversions.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No conversions yet",
            theme::dim_style(),
        )))
        .centered()
        .block(panel(" History ".into()));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Input", "Base", "Decimal", "When"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );
    let rows: Vec<Row> = app
        .conversions
        .iter()
        .enumerate()
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, c)| {
            let when = c.created_at.get(..16).unwrap_or(&c.created_at).replace('T', " ");
            Row::new(vec![
                Cell::from(c.input.clone()),
                Cell::from(c.base.to_string()),
                Cell::from(c.value.to_string()),
                Cell::from(when),
            ])
            .style(theme::row_style(i, None))
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(22),
        Constraint::Length(18),
    ];
    let title = format!(" History ({}) ", app.conversions.len());
    f.render_widget(
        Table::new(rows, widths).header(header).block(panel(title)),
        area,
    );
}
