//! Table of the students matching the search query.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};
use roster_client::{ClientState, Student};

use super::Component;
use crate::tui::action::Action;

/// Row selection over [`ClientState::visible_records`].
#[derive(Debug, Default)]
pub struct StudentTable {
    selected: usize,
}

impl StudentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    /// Keep the selection inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// The selected record, if any record is visible.
    pub fn selected_record<'a>(&self, state: &'a ClientState) -> Option<&'a Student> {
        state.visible_records().get(self.selected).copied()
    }
}

impl Component for StudentTable {
    fn handle_key_event(&mut self, _key: KeyEvent) -> Option<Action> {
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &ClientState) {
        let visible = state.visible_records();
        let title = if state.search_query.trim().is_empty() {
            format!(" All Students ({}) ", state.records.len())
        } else {
            format!(" Students ({} of {}) ", visible.len(), state.records.len())
        };
        let block = Block::default()
            .title(title)
            .title_bottom(" e: edit  d: delete ")
            .borders(Borders::ALL);

        if visible.is_empty() {
            let text = if state.loading {
                "Loading…"
            } else {
                "No students found."
            };
            let empty = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(["Student ID", "Name", "Email"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let rows = visible.iter().map(|student| {
            Row::new([
                student.student_id.as_str(),
                student.name.as_str(),
                student.email.as_str(),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(20),
                Constraint::Percentage(35),
                Constraint::Percentage(45),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol("> ");

        let mut table_state = TableState::default().with_selected(Some(self.selected()));
        frame.render_stateful_widget(table, area, &mut table_state);
    }
}
