//! Client state container and its transitions.
//!
//! [`ClientState`] holds everything the students screen shows: the record
//! set, the loading/busy flags, feedback text, the three form buffers and the
//! search query. Success and failure branches of every operation are plain
//! methods here so they can be exercised without a network or a terminal.

use std::ops::{Deref, DerefMut};

use crate::model::Student;
use crate::search::filter_by_search;

/// The single mutating operation currently in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BusyOperation {
    #[default]
    Idle,
    Add,
    Update,
    Delete,
}

impl BusyOperation {
    pub fn is_idle(&self) -> bool {
        matches!(self, BusyOperation::Idle)
    }

    /// Progress label shown while the operation runs.
    pub fn label(&self) -> &'static str {
        match self {
            BusyOperation::Idle => "Idle",
            BusyOperation::Add => "Adding…",
            BusyOperation::Update => "Updating…",
            BusyOperation::Delete => "Deleting…",
        }
    }
}

/// Buffer behind the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub student_id: String,
    pub name: String,
    pub email: String,
}

/// Buffer behind the update form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateForm {
    pub student_id: String,
    pub name: String,
    pub email: String,
}

/// Buffer behind the delete form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteForm {
    pub student_id: String,
}

/// Process-local state of the students screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    /// Records from the last successful list fetch
    pub records: Vec<Student>,
    /// A list fetch is in flight
    pub loading: bool,
    /// Mutating operation in flight
    pub busy: BusyOperation,
    /// Latest informational message (empty when none)
    pub last_message: String,
    /// Latest error message (empty when none)
    pub last_error: String,
    pub add_form: AddForm,
    pub update_form: UpdateForm,
    pub delete_form: DeleteForm,
    /// Local filter over `records`, never sent to the API
    pub search_query: String,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records matching the current search query, in fetch order.
    pub fn visible_records(&self) -> Vec<&Student> {
        filter_by_search(&self.records, &self.search_query)
    }

    /// Clear message and error before an operation starts.
    pub fn clear_feedback(&mut self) {
        self.last_message.clear();
        self.last_error.clear();
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.last_message = message.into();
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = error.into();
    }

    /// Whether a refresh may be started from the UI.
    pub fn can_refresh(&self) -> bool {
        !self.loading && self.busy.is_idle()
    }

    /// Whether the given mutating operation may be submitted from the UI.
    ///
    /// Only the same operation already being in flight blocks a submit.
    pub fn can_submit(&self, operation: BusyOperation) -> bool {
        operation != BusyOperation::Idle && self.busy != operation
    }

    pub fn list_succeeded(&mut self, records: Vec<Student>) {
        self.last_message = format!("Loaded {} student(s).", records.len());
        self.records = records;
    }

    /// A remote operation failed; prior records are kept.
    pub fn operation_failed(&mut self, error: impl Into<String>) {
        self.last_error = error.into();
    }

    /// Local validation rejected the input before any network call.
    pub fn validation_failed(&mut self, error: impl Into<String>) {
        self.last_error = error.into();
    }

    pub fn add_succeeded(&mut self) {
        self.last_message = "Student added.".to_string();
        self.add_form = AddForm::default();
    }

    /// The id buffer is kept so the same record can be edited again.
    pub fn update_succeeded(&mut self) {
        self.last_message = "Student updated.".to_string();
        self.update_form.name.clear();
        self.update_form.email.clear();
    }

    pub fn delete_succeeded(&mut self, student_id: &str, from_form: bool) {
        self.last_message = format!("Deleted {student_id}.");
        if from_form {
            self.delete_form = DeleteForm::default();
        }
    }

    /// Copy a record into the update form.
    pub fn load_into_update_form(&mut self, record: &Student) {
        self.update_form = UpdateForm {
            student_id: record.student_id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
        };
        self.last_message = "Loaded student into Update form.".to_string();
        self.last_error.clear();
    }
}

/// Scoped acquisition of [`ClientState::busy`].
///
/// Sets the operation on creation and resets it to `Idle` when dropped, so
/// every exit path of an operation releases the flag.
pub struct BusyGuard<'a> {
    state: &'a mut ClientState,
}

impl<'a> BusyGuard<'a> {
    pub fn acquire(state: &'a mut ClientState, operation: BusyOperation) -> Self {
        state.busy = operation;
        Self { state }
    }
}

impl Deref for BusyGuard<'_> {
    type Target = ClientState;

    fn deref(&self) -> &ClientState {
        self.state
    }
}

impl DerefMut for BusyGuard<'_> {
    fn deref_mut(&mut self) -> &mut ClientState {
        self.state
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.busy = BusyOperation::Idle;
    }
}

/// Scoped acquisition of [`ClientState::loading`].
pub struct LoadingGuard<'a> {
    state: &'a mut ClientState,
}

impl<'a> LoadingGuard<'a> {
    pub fn acquire(state: &'a mut ClientState) -> Self {
        state.loading = true;
        Self { state }
    }
}

impl Deref for LoadingGuard<'_> {
    type Target = ClientState;

    fn deref(&self) -> &ClientState {
        self.state
    }
}

impl DerefMut for LoadingGuard<'_> {
    fn deref_mut(&mut self) -> &mut ClientState {
        self.state
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.loading = false;
    }
}
