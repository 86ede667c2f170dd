//! Client-side model of the students screen.
//!
//! The remote API owns persistence and validation; this crate owns the local
//! state that mirrors it and the rules for how list/add/update/delete calls,
//! resynchronization and the busy/error flags interact. It knows nothing
//! about terminals or command lines.

pub mod api;
pub mod confirm;
pub mod controller;
pub mod model;
pub mod search;
pub mod state;

pub use api::{ApiError, HttpStudentsApi, StudentsApi};
pub use confirm::DeleteConfirmation;
pub use controller::{DeleteTarget, Outcome, PendingDelete, StudentsClient};
pub use model::{Student, StudentFields, StudentPatch};
pub use search::filter_by_search;
pub use state::{BusyOperation, ClientState};
