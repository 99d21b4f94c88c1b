use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::panel;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_movies(f, chunks[0], app);
    render_bookings(f, chunks[1], app);
}

fn render_movies(f: &mut Frame, area: Rect, app: &App) {
    if app.movies.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No movies yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :movie <seats> <name>",
                theme::dim_style(),
            )),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(panel(" Movies (0) ".into())),
            area,
        );
        return;
    }

    let header = Row::new(
        ["ID", "Name", "Booked", "Free"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );
    let rows: Vec<Row> = app
        .movies
        .iter()
        .zip(app.booked_counts.iter())
        .enumerate()
        .skip(app.movie_cursor.scroll)
        .map(|(i, (movie, booked))| {
            let free = movie.seats.saturating_sub(*booked);
            let free_style = if free == 0 {
                theme::wrong_style()
            } else {
                theme::correct_style()
            };
            Row::new(vec![
                Cell::from(movie.id.unwrap_or(0).to_string()),
                Cell::from(truncate(&movie.name, 30)),
                Cell::from(format!("{booked}/{}", movie.seats)),
                Cell::from(Span::styled(free.to_string(), free_style)),
            ])
            .style(theme::row_style(i, Some(app.movie_cursor.index)))
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(6),
    ];
    let title = format!(" Movies ({}) ", app.movies.len());
    f.render_widget(
        Table::new(rows, widths).header(header).block(panel(title)),
        area,
    );
}

fn render_bookings(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.selected_movie() {
        Some(movie) => format!(" Bookings: {} ", truncate(&movie.name, 24)),
        None => " Bookings ".to_string(),
    };

    if app.bookings.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No bookings", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled("Book with :book <seat> <user>", theme::dim_style())),
        ])
        .centered()
        .block(panel(title));
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["ID", "Seat", "User"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );
    let rows: Vec<Row> = app
        .bookings
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Row::new(vec![
                Cell::from(b.id.unwrap_or(0).to_string()),
                Cell::from(b.seat.clone()),
                Cell::from(truncate(&b.user, 24)),
            ])
            .style(theme::row_style(i, None))
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Min(10),
    ];
    f.render_widget(
        Table::new(rows, widths).header(header).block(panel(title)),
        area,
    );
}
