//! Modal asking the user to type the student id before it is deleted.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::widgets::text_input::{TextInput, TextInputAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmResult {
    Confirmed,
    Cancelled,
    /// Still open.
    Pending,
}

#[derive(Debug)]
pub struct ConfirmDialog {
    student_id: String,
    input: TextInput,
    visible: bool,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self {
            student_id: String::new(),
            input: TextInput::new(),
            visible: false,
        }
    }

    pub fn show(&mut self, student_id: &str) {
        self.student_id = student_id.to_string();
        self.input.clear();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.input.clear();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Enter confirms only once the typed text equals the id; Esc cancels.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ConfirmResult> {
        if !self.visible {
            return None;
        }

        let result = match self.input.handle_key(key) {
            TextInputAction::Submit if self.input.text() == self.student_id => {
                ConfirmResult::Confirmed
            }
            TextInputAction::Cancel => ConfirmResult::Cancelled,
            _ => ConfirmResult::Pending,
        };
        if result != ConfirmResult::Pending {
            self.hide();
        }
        Some(result)
    }

    /// Centered overlay on top of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let width = 60u16.min(area.width.saturating_sub(4));
        let height = 7u16.min(area.height.saturating_sub(2));
        let dialog = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title(" Confirm Deletion ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let [prompt_area, input_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Length(3)]).areas(inner);

        let prompt = Paragraph::new(format!(
            "Delete student {}? Type the id and press Enter, Esc to keep it.",
            self.student_id
        ))
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true });
        frame.render_widget(prompt, prompt_area);

        self.input.render(frame, input_area, "Student ID", true);
    }
}
