//! Bordered panels and key/value lines.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};

use crate::theme;

/// Rounded block with a styled title.
pub fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
}

/// `  Label      value` with a fixed label column.
pub fn kv_line<'a>(label: &'a str, value: impl Into<Span<'a>>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<14}"), theme::label()),
        value.into(),
    ])
}
