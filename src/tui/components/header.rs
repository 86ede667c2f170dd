//! Title, endpoint and the latest message or error.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use roster_client::ClientState;

use super::Component;
use crate::tui::action::Action;

pub struct Header {
    endpoint: String,
}

impl Header {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    fn feedback_line(state: &ClientState) -> Line<'_> {
        if !state.last_error.is_empty() {
            Line::from(vec![
                Span::styled(
                    "Error: ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(state.last_error.as_str(), Style::default().fg(Color::Red)),
            ])
        } else if !state.last_message.is_empty() {
            Line::from(vec![
                Span::styled(
                    "Info: ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::styled(state.last_message.as_str(), Style::default().fg(Color::Green)),
            ])
        } else {
            Line::default()
        }
    }
}

impl Component for Header {
    fn handle_key_event(&mut self, _key: KeyEvent) -> Option<Action> {
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &ClientState) {
        let block = Block::default()
            .title(" Students Manager ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let lines = vec![
            Line::from(Span::styled(
                format!("Connected to {}", self.endpoint),
                Style::default().fg(Color::DarkGray),
            )),
            Self::feedback_line(state),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tui::test_helpers::{assert_buffer_contains, buffer_text};

    fn render(state: &ClientState) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(100, 4)).unwrap();
        let header = Header::new("http://localhost:3000/students");
        terminal
            .draw(|frame| header.render(frame, frame.area(), state))
            .unwrap();
        terminal
    }

    #[test]
    fn shows_endpoint() {
        let terminal = render(&ClientState::new());
        assert_buffer_contains(&terminal, "Students Manager");
        assert_buffer_contains(&terminal, "Connected to http://localhost:3000/students");
    }

    #[test]
    fn error_takes_precedence_over_message() {
        let mut state = ClientState::new();
        state.set_message("Loaded 2 student(s).");
        state.set_error("Fetch failed (HTTP 500)");
        let terminal = render(&state);
        assert_buffer_contains(&terminal, "Error: Fetch failed (HTTP 500)");
        assert!(!buffer_text(&terminal).contains("Loaded 2"));
    }

    #[test]
    fn shows_message() {
        let mut state = ClientState::new();
        state.set_message("Loaded 2 student(s).");
        let terminal = render(&state);
        assert_buffer_contains(&terminal, "Info: Loaded 2 student(s).");
    }
}
