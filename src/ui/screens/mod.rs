pub(crate) mod converter;
pub(crate) mod expenses;
pub(crate) mod movies;
pub(crate) mod quiz;

use ratatui::{
    text::Span,
    widgets::{Block, Borders},
};
use ratatui::style::Style;

use crate::ui::theme;

/// Bordered panel with a dim bold title.
pub(crate) fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}
