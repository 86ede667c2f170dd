//! Add, update and delete forms backed by the [`ClientState`] buffers.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use roster_client::ClientState;

use super::Component;
use crate::tui::action::{Action, FormKind};
use crate::tui::widgets::text_input::{TextInput, TextInputAction};

const HELP: [&str; 8] = [
    "a  add a student",
    "u  update a student",
    "x  delete by id",
    "e  edit the selected row",
    "d  delete the selected row",
    "/  search",
    "r  refresh",
    "q  quit",
];

/// The open form, if any, and its text inputs.
#[derive(Debug, Default)]
pub struct FormPanel {
    kind: Option<FormKind>,
    inputs: Vec<TextInput>,
    focus: usize,
}

fn labels(kind: FormKind) -> &'static [&'static str] {
    match kind {
        FormKind::Add | FormKind::Update => &["Student ID", "Name", "Email"],
        FormKind::Delete => &["Student ID"],
    }
}

impl FormPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<FormKind> {
        self.kind
    }

    /// Open `kind` with the current buffer contents and focus its first field.
    pub fn open(&mut self, kind: FormKind, state: &ClientState) {
        self.kind = Some(kind);
        self.inputs = labels(kind)
            .iter()
            .map(|label| TextInput::with_placeholder(&format!("{label}…")))
            .collect();
        self.focus = 0;
        self.load(state);
    }

    /// Close the form; buffers keep what was typed.
    pub fn close(&mut self) {
        self.kind = None;
        self.inputs.clear();
    }

    /// Copy the buffers into the inputs.
    pub fn load(&mut self, state: &ClientState) {
        let values: Vec<&str> = match self.kind {
            Some(FormKind::Add) => vec![
                state.add_form.student_id.as_str(),
                state.add_form.name.as_str(),
                state.add_form.email.as_str(),
            ],
            Some(FormKind::Update) => vec![
                state.update_form.student_id.as_str(),
                state.update_form.name.as_str(),
                state.update_form.email.as_str(),
            ],
            Some(FormKind::Delete) => vec![state.delete_form.student_id.as_str()],
            None => return,
        };
        for (input, value) in self.inputs.iter_mut().zip(values) {
            if input.text() != value {
                input.set_text(value);
            }
        }
    }

    /// Copy the inputs into the buffers.
    pub fn store(&self, state: &mut ClientState) {
        let text = |i: usize| {
            self.inputs
                .get(i)
                .map(|input| input.text().to_string())
                .unwrap_or_default()
        };
        match self.kind {
            Some(FormKind::Add) => {
                state.add_form.student_id = text(0);
                state.add_form.name = text(1);
                state.add_form.email = text(2);
            }
            Some(FormKind::Update) => {
                state.update_form.student_id = text(0);
                state.update_form.name = text(1);
                state.update_form.email = text(2);
            }
            Some(FormKind::Delete) => state.delete_form.student_id = text(0),
            None => {}
        }
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = HELP.iter().map(|line| Line::from(*line)).collect();
        let help = Paragraph::new(lines)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(" Keys ").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

impl Component for FormPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        let kind = self.kind?;
        let count = self.inputs.len();
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % count;
                return Some(Action::None);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + count - 1) % count;
                return Some(Action::None);
            }
            _ => {}
        }

        match self.inputs.get_mut(self.focus)?.handle_key(key) {
            TextInputAction::Submit => Some(Action::Submit(kind)),
            TextInputAction::Cancel => Some(Action::Back),
            TextInputAction::Changed => Some(Action::None),
            TextInputAction::Unhandled => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &ClientState) {
        let Some(kind) = self.kind else {
            self.render_help(frame, area);
            return;
        };

        let busy = state.busy == kind.operation();
        let title = if busy {
            format!(" {} ({}) ", kind.title(), kind.operation().label())
        } else {
            format!(" {} ", kind.title())
        };
        let border = if busy { Color::Yellow } else { Color::Cyan };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints: Vec<Constraint> =
            self.inputs.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Min(1));
        let chunks = Layout::vertical(constraints).split(inner);

        for (i, (input, label)) in self.inputs.iter().zip(labels(kind)).enumerate() {
            input.render(frame, chunks[i], label, i == self.focus);
        }

        let mut hints = vec![Line::from("Enter: submit  Tab: next field  Esc: close")];
        if kind == FormKind::Update {
            hints.push(Line::from("Blank name or email is left unchanged."));
        }
        let hint = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, chunks[self.inputs.len()]);
    }
}
