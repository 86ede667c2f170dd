//! The students controller: remote operations applied to [`ClientState`].

use tokio::sync::watch;

use crate::api::{ApiError, StudentsApi};
use crate::confirm::DeleteConfirmation;
use crate::model::{StudentFields, StudentPatch};
use crate::state::{BusyGuard, BusyOperation, ClientState, LoadingGuard};

const ADD_REQUIRED: &str = "Add: studentId, name, and email are required.";
const UPDATE_ID_REQUIRED: &str = "Update: studentId is required.";
const UPDATE_FIELDS_REQUIRED: &str = "Update: provide at least name or email.";
const DELETE_ID_REQUIRED: &str = "Delete: studentId is required.";

/// How an operation ended. The user-facing text is in [`ClientState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The remote call succeeded.
    Succeeded,
    /// The remote call returned a non-success status or did not complete.
    Failed,
    /// Local validation rejected the input; nothing was sent.
    Rejected,
    /// The user declined the delete confirmation; nothing changed.
    Declined,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// Where the id of a deletion comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// A row in the table.
    Row(String),
    /// The delete form buffer.
    Form,
}

/// A validated deletion waiting for the user's confirmation.
///
/// Dropping it is the same as declining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    student_id: String,
    from_form: bool,
}

impl PendingDelete {
    pub fn student_id(&self) -> &str {
        &self.student_id
    }
}

#[derive(Debug, Clone, Copy)]
enum RemoteOperation {
    Fetch,
    Add,
    Update,
    Delete,
}

impl RemoteOperation {
    fn label(self) -> &'static str {
        match self {
            RemoteOperation::Fetch => "Fetch",
            RemoteOperation::Add => "Add",
            RemoteOperation::Update => "Update",
            RemoteOperation::Delete => "Delete",
        }
    }
}

/// User-facing error text combining operation, status and body.
///
/// List failures omit the body; mutation failures embed it verbatim.
fn failure_message(operation: RemoteOperation, error: &ApiError) -> String {
    let label = operation.label();
    match (operation, error) {
        (RemoteOperation::Fetch, ApiError::Status { status, .. }) => {
            format!("{label} failed (HTTP {status})")
        }
        (_, ApiError::Status { status, body }) => format!("{label} failed (HTTP {status}): {body}"),
        (_, other) => format!("{label} failed: {other}"),
    }
}

/// Stateful controller behind the students screen.
///
/// Owns the API client and the [`ClientState`]. Every operation records its
/// result in the state; none of them return errors.
///
/// Each time an operation raises the busy or loading flag, a copy of the
/// state is sent to the receivers handed out by [`subscribe`](Self::subscribe).
pub struct StudentsClient<A> {
    api: A,
    state: ClientState,
    progress: watch::Sender<ClientState>,
}

impl<A: StudentsApi> StudentsClient<A> {
    pub fn new(api: A) -> Self {
        let (progress, _) = watch::channel(ClientState::new());
        Self {
            api,
            state: ClientState::new(),
            progress,
        }
    }

    /// Snapshots of the state taken when an operation raises its flag.
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.progress.subscribe()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Direct access for form editing and the search query.
    pub fn state_mut(&mut self) -> &mut ClientState {
        &mut self.state
    }

    /// Fetch the full collection and replace `records` on success.
    pub async fn list(&mut self) -> Outcome {
        refresh(&self.api, &self.progress, &mut self.state).await
    }

    /// Create a student, then resynchronize.
    pub async fn add(&mut self, fields: StudentFields) -> Outcome {
        self.state.clear_feedback();
        if fields.has_blank() {
            self.state.validation_failed(ADD_REQUIRED);
            return Outcome::Rejected;
        }

        let payload = fields.trimmed();
        let mut state = BusyGuard::acquire(&mut self.state, BusyOperation::Add);
        publish(&self.progress, &state);
        log::debug!("Adding student {}", payload.student_id);

        match self.api.create(&payload).await {
            Ok(()) => {
                log::info!("Added student {}", payload.student_id);
                state.add_succeeded();
                refresh(&self.api, &self.progress, &mut state).await;
                Outcome::Succeeded
            }
            Err(e) => {
                log::warn!("Add of {} failed: {e}", payload.student_id);
                state.operation_failed(failure_message(RemoteOperation::Add, &e));
                Outcome::Failed
            }
        }
    }

    /// Send a partial update with the non-blank fields, then resynchronize.
    pub async fn update(&mut self, student_id: &str, name: &str, email: &str) -> Outcome {
        self.state.clear_feedback();
        let student_id = student_id.trim();
        if student_id.is_empty() {
            self.state.validation_failed(UPDATE_ID_REQUIRED);
            return Outcome::Rejected;
        }
        let patch = StudentPatch::from_input(name, email);
        if patch.is_empty() {
            self.state.validation_failed(UPDATE_FIELDS_REQUIRED);
            return Outcome::Rejected;
        }

        let mut state = BusyGuard::acquire(&mut self.state, BusyOperation::Update);
        publish(&self.progress, &state);
        log::debug!("Updating student {student_id}");

        match self.api.update(student_id, &patch).await {
            Ok(()) => {
                log::info!("Updated student {student_id}");
                state.update_succeeded();
                refresh(&self.api, &self.progress, &mut state).await;
                Outcome::Succeeded
            }
            Err(e) => {
                log::warn!("Update of {student_id} failed: {e}");
                state.operation_failed(failure_message(RemoteOperation::Update, &e));
                Outcome::Failed
            }
        }
    }

    /// Resolve and validate the id for a deletion without sending anything.
    ///
    /// Returns `None` after recording a validation error when the resolved id
    /// is blank.
    pub fn prepare_delete(&mut self, target: DeleteTarget) -> Option<PendingDelete> {
        let (raw, from_form) = match target {
            DeleteTarget::Row(id) => (id, false),
            DeleteTarget::Form => (self.state.delete_form.student_id.clone(), true),
        };

        let student_id = raw.trim();
        if student_id.is_empty() {
            self.state.clear_feedback();
            self.state.validation_failed(DELETE_ID_REQUIRED);
            return None;
        }

        Some(PendingDelete {
            student_id: student_id.to_string(),
            from_form,
        })
    }

    /// Delete after asking `confirmation`; a declined prompt changes nothing.
    pub async fn delete<C>(&mut self, target: DeleteTarget, confirmation: &mut C) -> Outcome
    where
        C: DeleteConfirmation + ?Sized,
    {
        let Some(pending) = self.prepare_delete(target) else {
            return Outcome::Rejected;
        };

        if !confirmation.confirm_delete(pending.student_id()) {
            log::debug!("Deletion of {} declined", pending.student_id);
            return Outcome::Declined;
        }

        self.delete_confirmed(pending).await
    }

    /// Send a deletion the user already confirmed, then resynchronize.
    pub async fn delete_confirmed(&mut self, pending: PendingDelete) -> Outcome {
        self.state.clear_feedback();
        let PendingDelete {
            student_id,
            from_form,
        } = pending;

        let mut state = BusyGuard::acquire(&mut self.state, BusyOperation::Delete);
        publish(&self.progress, &state);
        log::debug!("Deleting student {student_id}");

        match self.api.delete(&student_id).await {
            Ok(()) => {
                log::info!("Deleted student {student_id}");
                state.delete_succeeded(&student_id, from_form);
                refresh(&self.api, &self.progress, &mut state).await;
                Outcome::Succeeded
            }
            Err(e) => {
                log::warn!("Delete of {student_id} failed: {e}");
                state.operation_failed(failure_message(RemoteOperation::Delete, &e));
                Outcome::Failed
            }
        }
    }
}

/// Hand a copy of the state to subscribers, if there are any.
fn publish(progress: &watch::Sender<ClientState>, state: &ClientState) {
    if progress.receiver_count() > 0 {
        progress.send_replace(state.clone());
    }
}

/// List fetch shared by `list()` and the post-mutation resynchronization.
async fn refresh<A: StudentsApi + ?Sized>(
    api: &A,
    progress: &watch::Sender<ClientState>,
    state: &mut ClientState,
) -> Outcome {
    let mut state = LoadingGuard::acquire(state);
    state.clear_feedback();
    publish(progress, &state);

    match api.list().await {
        Ok(records) => {
            log::info!("Loaded {} student(s)", records.len());
            state.list_succeeded(records);
            Outcome::Succeeded
        }
        Err(e) => {
            log::warn!("Fetching students failed: {e}");
            state.operation_failed(failure_message(RemoteOperation::Fetch, &e));
            Outcome::Failed
        }
    }
}
