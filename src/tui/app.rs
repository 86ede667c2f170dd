//! Students screen: owns the controller, the event loop and the render cycle.

use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use roster_client::{
    ClientState, DeleteTarget, Outcome, PendingDelete, StudentFields, StudentsApi, StudentsClient,
};
use tokio::sync::watch;

use super::action::{Action, FormKind, is_quit_chord, map_key_to_action};
use super::components::Component;
use super::components::confirm_dialog::{ConfirmDialog, ConfirmResult};
use super::components::form::FormPanel;
use super::components::header::Header;
use super::components::search_bar::SearchBar;
use super::components::status_bar::StatusBar;
use super::components::student_table::StudentTable;
use super::event::{Event, EventHandler};
use super::terminal::Tui;

/// Which panel receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Table,
    Search,
    Form,
}

/// A remote call requested from the screen.
#[derive(Debug)]
enum Operation {
    Refresh,
    Add(StudentFields),
    Update {
        student_id: String,
        name: String,
        email: String,
    },
    Delete(PendingDelete),
}

async fn execute<A: StudentsApi>(client: &mut StudentsClient<A>, operation: Operation) -> Outcome {
    match operation {
        Operation::Refresh => client.list().await,
        Operation::Add(fields) => client.add(fields).await,
        Operation::Update {
            student_id,
            name,
            email,
        } => client.update(&student_id, &name, &email).await,
        Operation::Delete(pending) => client.delete_confirmed(pending).await,
    }
}

/// Restore the terminal after the event loop, whatever the loop returned.
///
/// An error from the loop wins over an error from `exit`.
fn leave<T>(
    result: anyhow::Result<T>,
    exit: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<T> {
    let exited = exit();
    result.and_then(|value| exited.map(|()| value))
}

/// The widgets making up the screen.
struct Panels {
    header: Header,
    table: StudentTable,
    form: FormPanel,
    search_bar: SearchBar,
    status_bar: StatusBar,
    confirm_dialog: ConfirmDialog,
}

impl Panels {
    fn render(&self, frame: &mut Frame, state: &ClientState) {
        let [header_area, body_area, search_area, status_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [table_area, form_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(body_area);

        self.header.render(frame, header_area, state);
        self.table.render(frame, table_area, state);
        self.form.render(frame, form_area, state);
        self.search_bar.render(frame, search_area, state);
        self.status_bar.render(frame, status_area, state);
        self.confirm_dialog.render(frame, frame.area());
    }
}

pub struct App<A> {
    client: StudentsClient<A>,
    /// State as it was when the running operation raised its flag.
    progress: watch::Receiver<ClientState>,
    tick_rate: Duration,
    running: bool,
    focus: Focus,
    /// Deletion waiting for the confirm dialog.
    pending_delete: Option<PendingDelete>,
    panels: Panels,
}

impl<A: StudentsApi> App<A> {
    pub fn new(api: A, endpoint: impl Into<String>, tick_rate: Duration) -> Self {
        let client = StudentsClient::new(api);
        let progress = client.subscribe();
        Self {
            client,
            progress,
            tick_rate,
            running: true,
            focus: Focus::Table,
            pending_delete: None,
            panels: Panels {
                header: Header::new(endpoint),
                table: StudentTable::new(),
                form: FormPanel::new(),
                search_bar: SearchBar::new(),
                status_bar: StatusBar::new(),
                confirm_dialog: ConfirmDialog::new(),
            },
        }
    }

    /// Load the students, then run the event loop until quit.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut tui = Tui::new()?;
        tui.init()?;

        let result = self.event_loop(&mut tui).await;
        leave(result, || tui.exit())
    }

    async fn event_loop(&mut self, tui: &mut Tui) -> anyhow::Result<()> {
        let mut events = EventHandler::new(self.tick_rate);
        tui.terminal.draw(|frame| self.render(frame))?;
        self.perform_live(Operation::Refresh, tui, &mut events).await?;

        while self.running {
            match events.next().await? {
                Event::Key(key) => {
                    if let Some(operation) = self.handle_key(key) {
                        self.perform_live(operation, tui, &mut events).await?;
                    }
                }
                Event::Tick => {}
                Event::Render => {
                    tui.terminal.draw(|frame| self.render(frame))?;
                }
            }
        }
        Ok(())
    }

    /// Run `operation`, drawing the in-flight state until it completes.
    ///
    /// Only the quit keys are read meanwhile. Quitting drops the request,
    /// which releases its flags.
    async fn perform_live(
        &mut self,
        operation: Operation,
        tui: &mut Tui,
        events: &mut EventHandler,
    ) -> anyhow::Result<()> {
        log::debug!("Starting {operation:?}");
        {
            let request = execute(&mut self.client, operation);
            tokio::pin!(request);

            loop {
                tokio::select! {
                    // The request is polled first so its flag is published
                    // before any frame is drawn.
                    biased;

                    _ = &mut request => break,
                    Ok(()) = self.progress.changed() => {
                        let snapshot = self.progress.borrow_and_update().clone();
                        tui.terminal.draw(|frame| self.panels.render(frame, &snapshot))?;
                    }
                    event = events.next() => match event? {
                        Event::Key(key) if is_quit_chord(key) => {
                            log::info!("Quit with a request in flight");
                            self.running = false;
                            break;
                        }
                        Event::Render => {
                            let snapshot = self.progress.borrow().clone();
                            tui.terminal.draw(|frame| self.panels.render(frame, &snapshot))?;
                        }
                        Event::Key(_) | Event::Tick => {}
                    },
                }
            }
        }

        self.operation_finished();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Operation> {
        if self.panels.confirm_dialog.is_visible() {
            return match self.panels.confirm_dialog.handle_key(key) {
                Some(ConfirmResult::Confirmed) => self.pending_delete.take().map(Operation::Delete),
                Some(ConfirmResult::Cancelled) => {
                    log::debug!("Deletion declined");
                    self.pending_delete = None;
                    None
                }
                Some(ConfirmResult::Pending) | None => None,
            };
        }

        let fallback = |key| {
            if is_quit_chord(key) {
                Action::Quit
            } else {
                Action::None
            }
        };
        let action = match self.focus {
            Focus::Table => map_key_to_action(key),
            Focus::Search => self
                .panels
                .search_bar
                .handle_key_event(key)
                .unwrap_or_else(|| fallback(key)),
            Focus::Form => {
                let action = self
                    .panels
                    .form
                    .handle_key_event(key)
                    .unwrap_or_else(|| fallback(key));
                self.panels.form.store(self.client.state_mut());
                action
            }
        };

        self.handle_action(action)
    }

    fn handle_action(&mut self, action: Action) -> Option<Operation> {
        match action {
            Action::Quit => self.running = false,
            Action::Refresh => {
                if self.client.state().can_refresh() {
                    return Some(Operation::Refresh);
                }
            }
            Action::ScrollUp => self.panels.table.select_prev(),
            Action::ScrollDown => {
                let len = self.client.state().visible_records().len();
                self.panels.table.select_next(len);
            }
            Action::FocusSearch => {
                self.focus = Focus::Search;
                self.panels.search_bar.focused = true;
            }
            Action::OpenForm(kind) => self.open_form(kind),
            Action::EditSelected => {
                if let Some(record) = self
                    .panels
                    .table
                    .selected_record(self.client.state())
                    .cloned()
                {
                    self.client.state_mut().load_into_update_form(&record);
                    self.open_form(FormKind::Update);
                }
            }
            Action::DeleteSelected => {
                let selected = self
                    .panels
                    .table
                    .selected_record(self.client.state())
                    .map(|record| record.student_id.clone());
                if let Some(student_id) = selected {
                    self.request_delete(DeleteTarget::Row(student_id));
                }
            }
            Action::Submit(kind) => return self.submit(kind),
            Action::SearchChanged(query) => {
                self.client.state_mut().search_query = query;
                self.panels.table.select_first();
            }
            Action::Back => match self.focus {
                Focus::Search => {
                    self.panels.search_bar.focused = false;
                    self.focus = Focus::Table;
                }
                Focus::Form => {
                    self.panels.form.close();
                    self.focus = Focus::Table;
                }
                Focus::Table => {}
            },
            Action::None => {}
        }
        None
    }

    fn open_form(&mut self, kind: FormKind) {
        self.panels.search_bar.focused = false;
        self.panels.form.open(kind, self.client.state());
        self.focus = Focus::Form;
    }

    fn submit(&mut self, kind: FormKind) -> Option<Operation> {
        if self.panels.form.kind() != Some(kind) {
            return None;
        }
        if !self.client.state().can_submit(kind.operation()) {
            log::debug!("Ignoring {kind:?} submit while it is in flight");
            return None;
        }

        match kind {
            FormKind::Add => {
                let form = self.client.state().add_form.clone();
                Some(Operation::Add(StudentFields::new(
                    form.student_id,
                    form.name,
                    form.email,
                )))
            }
            FormKind::Update => {
                let form = self.client.state().update_form.clone();
                Some(Operation::Update {
                    student_id: form.student_id,
                    name: form.name,
                    email: form.email,
                })
            }
            FormKind::Delete => {
                self.request_delete(DeleteTarget::Form);
                None
            }
        }
    }

    /// Validate the id and open the confirm dialog for it.
    fn request_delete(&mut self, target: DeleteTarget) {
        if !self.client.state().can_submit(FormKind::Delete.operation()) {
            return;
        }
        if let Some(pending) = self.client.prepare_delete(target) {
            self.panels.confirm_dialog.show(pending.student_id());
            self.pending_delete = Some(pending);
        }
    }

    /// Bring the panels in line with the state an operation left behind.
    fn operation_finished(&mut self) {
        self.progress.mark_unchanged();
        let state = self.client.state();
        self.panels.form.load(state);
        self.panels.table.clamp(state.visible_records().len());
        self.panels
            .status_bar
            .operation_finished(state, chrono::Local::now());
    }

    fn render(&self, frame: &mut Frame) {
        self.panels.render(frame, self.client.state());
    }
}
