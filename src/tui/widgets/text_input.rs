//! Single-line text input used by the forms, the search bar and the
//! delete confirmation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Editable text with a byte-offset cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: String,
    cursor: usize,
    placeholder: String,
}

/// What a key press did to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputAction {
    /// Enter
    Submit,
    /// Esc
    Cancel,
    /// Text or cursor changed.
    Changed,
    /// The key means nothing to the input.
    Unhandled,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(placeholder: &str) -> Self {
        Self {
            placeholder: placeholder.to_string(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace the text and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> TextInputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return TextInputAction::Submit,
            KeyCode::Esc => return TextInputAction::Cancel,
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.text.len(),
            KeyCode::Char('u') if ctrl => {
                self.text.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char(_) if ctrl => return TextInputAction::Unhandled,
            KeyCode::Char(c) => {
                self.text.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            KeyCode::Backspace => {
                let start = self.prev_boundary();
                self.text.drain(start..self.cursor);
                self.cursor = start;
            }
            KeyCode::Delete => {
                let end = self.next_boundary();
                self.text.drain(self.cursor..end);
            }
            KeyCode::Left => self.cursor = self.prev_boundary(),
            KeyCode::Right => self.cursor = self.next_boundary(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.len(),
            _ => return TextInputAction::Unhandled,
        }
        TextInputAction::Changed
    }

    /// Draw a bordered box titled `title`; the focused input shows a block cursor.
    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str, focused: bool) {
        let (content, style) = match (focused, self.text.is_empty()) {
            (false, true) => (self.placeholder.clone(), Style::default().fg(Color::DarkGray)),
            (false, false) => (self.text.clone(), Style::default().fg(Color::Gray)),
            (true, _) => {
                let (before, after) = self.text.split_at(self.cursor);
                (
                    format!("{before}\u{2588}{after}"),
                    Style::default().fg(Color::White),
                )
            }
        };

        let border = if focused { Color::Yellow } else { Color::DarkGray };
        let block = Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        frame.render_widget(Paragraph::new(content).style(style).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tui::test_helpers::assert_buffer_contains;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press_ctrl(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::new();
        for c in text.chars() {
            input.handle_key(press(KeyCode::Char(c)));
        }
        input
    }

    #[test]
    fn typing_appends() {
        let input = typed("S1");
        assert_eq!(input.text(), "S1");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn backspace_and_delete() {
        let mut input = typed("abc");
        assert_eq!(
            input.handle_key(press(KeyCode::Backspace)),
            TextInputAction::Changed
        );
        assert_eq!(input.text(), "ab");

        input.handle_key(press(KeyCode::Home));
        input.handle_key(press(KeyCode::Delete));
        assert_eq!(input.text(), "b");
        assert_eq!(input.cursor, 0);

        input.handle_key(press(KeyCode::Backspace));
        assert_eq!(input.text(), "b");
    }

    #[test]
    fn cursor_moves_over_multibyte_chars() {
        let mut input = typed("né");
        input.handle_key(press(KeyCode::Left));
        assert_eq!(input.cursor, 1);
        input.handle_key(press(KeyCode::Char('x')));
        assert_eq!(input.text(), "nxé");
        input.handle_key(press(KeyCode::Right));
        assert_eq!(input.cursor, input.text().len());
        input.handle_key(press(KeyCode::Right));
        assert_eq!(input.cursor, input.text().len());
    }

    #[test]
    fn control_chords() {
        let mut input = typed("abcdef");
        input.handle_key(press_ctrl('a'));
        assert_eq!(input.cursor, 0);
        input.handle_key(press_ctrl('e'));
        assert_eq!(input.cursor, 6);
        input.handle_key(press(KeyCode::Left));
        input.handle_key(press_ctrl('u'));
        assert_eq!(input.text(), "f");
        assert_eq!(input.handle_key(press_ctrl('c')), TextInputAction::Unhandled);
    }

    #[test]
    fn enter_and_esc() {
        let mut input = TextInput::new();
        assert_eq!(
            input.handle_key(press(KeyCode::Enter)),
            TextInputAction::Submit
        );
        assert_eq!(
            input.handle_key(press(KeyCode::Esc)),
            TextInputAction::Cancel
        );
        assert_eq!(
            input.handle_key(press(KeyCode::F(1))),
            TextInputAction::Unhandled
        );
    }

    #[test]
    fn set_text_and_clear() {
        let mut input = TextInput::new();
        input.set_text("alice@x.com");
        assert_eq!(input.cursor, 11);
        input.clear();
        assert!(input.text().is_empty());
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn render_shows_title_and_text() {
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        let input = typed("Alice");
        terminal
            .draw(|frame| input.render(frame, frame.area(), "Name", true))
            .unwrap();
        assert_buffer_contains(&terminal, "Name");
        assert_buffer_contains(&terminal, "Alice");
    }

    #[test]
    fn render_placeholder_when_unfocused_and_empty() {
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        let input = TextInput::with_placeholder("e.g. 2304259A");
        terminal
            .draw(|frame| input.render(frame, frame.area(), "Student ID", false))
            .unwrap();
        assert_buffer_contains(&terminal, "e.g. 2304259A");
    }
}
