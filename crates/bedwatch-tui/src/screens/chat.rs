//! Chat screen — the full conversation feed, newest first, scrollable.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap};

use bedwatch_core::{ChatMessage, Snapshot};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::panel::panel;

const PAGE: isize = 10;

pub struct ChatScreen {
    focused: bool,
    chat: Snapshot<ChatMessage>,
    /// Index of the first visible message.
    scroll_offset: usize,
}

impl ChatScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            chat: Arc::default(),
            scroll_offset: 0,
        }
    }

    fn max_offset(&self) -> usize {
        self.chat.len().saturating_sub(1)
    }

    fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add_signed(delta)
            .min(self.max_offset());
    }

    fn message_lines(msg: &ChatMessage) -> [Line<'_>; 3] {
        [
            Line::from(vec![
                Span::styled(msg.role.label(), theme::chat_role_style(msg.role)),
                Span::styled(format!("  {}", msg.time), theme::label()),
            ]),
            Line::from(Span::styled(msg.content.as_str(), theme::table_row())),
            Line::from(""),
        ]
    }
}

impl Component for ChatScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match (key.modifiers, key.code) {
            (_, KeyCode::Char('j') | KeyCode::Down) => Action::ScrollDown,
            (_, KeyCode::Char('k') | KeyCode::Up) => Action::ScrollUp,
            (_, KeyCode::Char('g') | KeyCode::Home) => Action::ScrollToTop,
            (_, KeyCode::Char('G') | KeyCode::End) => Action::ScrollToBottom,
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::PageDown) => {
                Action::PageDown
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) | (_, KeyCode::PageUp) => Action::PageUp,
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ChatUpdated(chat) => {
                // Keep the same message in view while new turns arrive on top
                if self.scroll_offset > 0 {
                    let added = chat.len().saturating_sub(self.chat.len());
                    self.scroll_offset += added;
                }
                self.chat = Arc::clone(chat);
                self.scroll_offset = self.scroll_offset.min(self.max_offset());
            }
            Action::ScrollDown => self.scroll_by(1),
            Action::ScrollUp => self.scroll_by(-1),
            Action::PageDown => self.scroll_by(PAGE),
            Action::PageUp => self.scroll_by(-PAGE),
            Action::ScrollToTop => self.scroll_offset = 0,
            Action::ScrollToBottom => self.scroll_offset = self.max_offset(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel(&format!("Chat ({})", self.chat.len()), self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if self.chat.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No chat messages yet", theme::label())),
                layout[0],
            );
        } else {
            let lines: Vec<Line> = self
                .chat
                .iter()
                .skip(self.scroll_offset)
                .flat_map(|msg| Self::message_lines(msg))
                .collect();
            let body = Paragraph::new(lines).wrap(Wrap { trim: false });
            frame.render_widget(body, layout[0].inner(Margin::new(1, 0)));

            let mut scrollbar = ScrollbarState::new(self.chat.len()).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[0],
                &mut scrollbar,
            );
        }

        let hints = Line::from(vec![
            Span::styled(" j/k ", theme::key_hint_key()),
            Span::styled("scroll  ", theme::key_hint()),
            Span::styled("g/G ", theme::key_hint_key()),
            Span::styled("newest/oldest  ", theme::key_hint()),
            Span::styled("Ctrl+d/u ", theme::key_hint_key()),
            Span::styled("page", theme::key_hint()),
            Span::styled(
                format!("   {}/{}", self.scroll_offset + 1, self.chat.len().max(1)),
                Style::default().fg(theme::MUTED),
            ),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bedwatch_core::{ChatRole, Generator, extract_chat_from_log};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{render_to_string, snapshot};

    fn screen_with(n: usize) -> (ChatScreen, Vec<ChatMessage>) {
        let mut generator = Generator::from_seed(Some(21));
        let chat: Vec<_> = (0..n)
            .flat_map(|_| extract_chat_from_log(&generator.generate_log()))
            .collect();
        let mut screen = ChatScreen::new();
        screen.update(&Action::ChatUpdated(snapshot(chat.clone()))).unwrap();
        (screen, chat)
    }

    #[test]
    fn empty_chat_has_placeholder() {
        let text = render_to_string(&ChatScreen::new(), 100, 20);
        assert!(text.contains("Chat (0)"));
        assert!(text.contains("No chat messages yet"));
    }

    #[test]
    fn renders_roles_newest_first() {
        let (screen, chat) = screen_with(3);
        let text = render_to_string(&screen, 120, 30);
        assert!(text.contains("Chat (6)"));
        assert_eq!(chat[0].role, ChatRole::User);
        assert!(text.contains("You"));
        assert!(text.contains("Assistant"));
        assert!(text.contains(&chat[0].time));
    }

    #[test]
    fn scrolling_is_clamped() {
        let (mut screen, chat) = screen_with(2);
        screen.update(&Action::ScrollUp).unwrap();
        assert_eq!(screen.scroll_offset, 0);
        screen.update(&Action::PageDown).unwrap();
        assert_eq!(screen.scroll_offset, chat.len() - 1);
        screen.update(&Action::ScrollToTop).unwrap();
        assert_eq!(screen.scroll_offset, 0);
    }

    #[test]
    fn new_messages_keep_scrolled_view_anchored() {
        let (mut screen, chat) = screen_with(2);
        screen.update(&Action::ScrollDown).unwrap();
        let viewed = chat[1].id.clone();

        let mut grown = vec![chat[0].clone(), chat[1].clone()];
        grown.extend(chat.iter().cloned());
        screen.update(&Action::ChatUpdated(snapshot(grown.clone()))).unwrap();
        assert_eq!(grown[screen.scroll_offset].id, viewed);
    }

    #[test]
    fn keys_map_to_scroll_actions() {
        let (mut screen, _) = screen_with(1);
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(action, Some(Action::ScrollDown)));
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(matches!(action, Some(Action::PageDown)));
    }
}
