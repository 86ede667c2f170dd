//! Panels of the students screen.

pub mod confirm_dialog;
pub mod form;
pub mod header;
pub mod search_bar;
pub mod status_bar;
pub mod student_table;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use roster_client::ClientState;

use super::action::Action;

/// A panel the [`App`](super::app::App) can route keys to and draw.
pub trait Component {
    /// Translate a key press into an [`Action`], or `None` when the panel
    /// does not use the key.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action>;

    fn render(&self, frame: &mut Frame, area: Rect, state: &ClientState);
}
