//! Console palette and semantic styles for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use bedwatch_core::{ChatRole, RiskLevel};

// ── Palette ───────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(255, 153, 0); // #ff9900
pub const CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const PINK: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const RED: Color = Color::Rgb(255, 99, 99); // #ff6363

pub const TEXT: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const MUTED: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

/// Gauge colors, cycled per distribution row.
pub const GAUGE_SERIES: &[Color] = &[CYAN, PINK, ACCENT, GREEN, YELLOW];

// ── Semantic styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn border(focused: bool) -> Style {
    if focused {
        border_focused()
    } else {
        border_default()
    }
}

pub fn table_header() -> Style {
    Style::default()
        .fg(CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn tab_active() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT)
}

pub fn label() -> Style {
    Style::default().fg(MUTED)
}

pub fn value() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

/// Green for Low, yellow for Medium, red for High.
pub fn risk_color(risk: RiskLevel) -> Color {
    match risk {
        RiskLevel::Low => GREEN,
        RiskLevel::Medium => YELLOW,
        RiskLevel::High => RED,
    }
}

pub fn risk_style(risk: RiskLevel) -> Style {
    Style::default()
        .fg(risk_color(risk))
        .add_modifier(Modifier::BOLD)
}

pub fn chat_role_style(role: ChatRole) -> Style {
    match role {
        ChatRole::User => Style::default().fg(CYAN).add_modifier(Modifier::BOLD),
        ChatRole::Assistant => Style::default().fg(PINK).add_modifier(Modifier::BOLD),
    }
}
