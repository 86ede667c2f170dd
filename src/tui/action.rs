//! Actions that drive the students screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_client::BusyOperation;

/// The three editing forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Update,
    Delete,
}

impl FormKind {
    /// Busy state that blocks submitting this form.
    pub fn operation(self) -> BusyOperation {
        match self {
            FormKind::Add => BusyOperation::Add,
            FormKind::Update => BusyOperation::Update,
            FormKind::Delete => BusyOperation::Delete,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::Add => "Add Student",
            FormKind::Update => "Update Student",
            FormKind::Delete => "Delete Student",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    ScrollUp,
    ScrollDown,
    FocusSearch,
    OpenForm(FormKind),
    /// Copy the selected row into the update form.
    EditSelected,
    /// Ask to delete the selected row.
    DeleteSelected,
    Submit(FormKind),
    SearchChanged(String),
    Back,
    None,
}

pub fn is_quit_chord(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Map a key pressed while the table has focus.
pub fn map_key_to_action(key: KeyEvent) -> Action {
    if is_quit_chord(key) {
        return Action::Quit;
    }
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('/') => Action::FocusSearch,
        KeyCode::Char('a') => Action::OpenForm(FormKind::Add),
        KeyCode::Char('u') => Action::OpenForm(FormKind::Update),
        KeyCode::Char('x') => Action::OpenForm(FormKind::Delete),
        KeyCode::Char('e') | KeyCode::Enter => Action::EditSelected,
        KeyCode::Char('d') => Action::DeleteSelected,
        KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,
        KeyCode::Esc => Action::Back,
        _ => Action::None,
    }
}
