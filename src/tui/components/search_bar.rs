//! Free-text filter over the loaded students.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use roster_client::ClientState;

use super::Component;
use crate::tui::action::Action;
use crate::tui::widgets::text_input::{TextInput, TextInputAction};

pub struct SearchBar {
    input: TextInput,
    pub focused: bool,
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            input: TextInput::with_placeholder("Search by ID, name or email (press /)"),
            focused: false,
        }
    }
}

impl Component for SearchBar {
    /// Every edit reports the new query so the table filters as you type.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match self.input.handle_key(key) {
            TextInputAction::Changed => Some(Action::SearchChanged(self.input.text().to_string())),
            TextInputAction::Submit | TextInputAction::Cancel => Some(Action::Back),
            TextInputAction::Unhandled => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _state: &ClientState) {
        self.input.render(frame, area, "Search", self.focused);
    }
}
