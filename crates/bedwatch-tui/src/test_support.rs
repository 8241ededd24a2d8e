//! Helpers for rendering components into an in-memory terminal.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use ratatui::{Frame, Terminal, backend::TestBackend};

use bedwatch_core::Snapshot;

use crate::component::Component;

/// Draw with `render` and return the buffer text, one line per row.
pub fn draw_to_string(width: u16, height: u16, render: impl FnOnce(&mut Frame)) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(render).unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

pub fn render_to_string(component: &dyn Component, width: u16, height: u16) -> String {
    draw_to_string(width, height, |frame| {
        let area = frame.area();
        component.render(frame, area);
    })
}

pub fn snapshot<T>(items: Vec<T>) -> Snapshot<T> {
    Arc::new(items.into_iter().map(Arc::new).collect())
}
