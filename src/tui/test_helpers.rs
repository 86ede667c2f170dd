use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use roster_client::{ApiError, Student, StudentFields, StudentPatch, StudentsApi};
use tokio::sync::Notify;

/// Everything drawn into the terminal buffer, row after row.
pub fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

/// Assert that the terminal buffer contains the given text
pub fn assert_buffer_contains(terminal: &Terminal<TestBackend>, text: &str) {
    let content = buffer_text(terminal);
    assert!(
        content.contains(text),
        "Buffer does not contain '{text}'.\nBuffer content: {content}"
    );
}

/// In-memory students API for driving the app without a server.
#[derive(Default)]
pub struct StubApi {
    pub records: Mutex<Vec<Student>>,
    pub requests: Mutex<Vec<String>>,
    pub fail_mutations: Mutex<bool>,
    /// When set, every request waits for one permit before it is served.
    gate: Mutex<Option<Arc<Notify>>>,
}

impl StubApi {
    pub fn with_records(records: Vec<Student>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make requests wait until the returned gate is notified, once each.
    pub fn hold_requests(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) -> Result<(), ApiError> {
        self.requests.lock().unwrap().push(request);
        if *self.fail_mutations.lock().unwrap() {
            return Err(ApiError::Status {
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StudentsApi for StubApi {
    async fn list(&self) -> Result<Vec<Student>, ApiError> {
        self.pass_gate().await;
        self.requests.lock().unwrap().push("GET".into());
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, fields: &StudentFields) -> Result<(), ApiError> {
        self.pass_gate().await;
        self.record(format!("POST {}", fields.student_id))?;
        self.records.lock().unwrap().push(Student::new(
            fields.student_id.clone(),
            fields.name.clone(),
            fields.email.clone(),
        ));
        Ok(())
    }

    async fn update(&self, student_id: &str, patch: &StudentPatch) -> Result<(), ApiError> {
        self.pass_gate().await;
        self.record(format!("PUT {student_id}"))?;
        let mut records = self.records.lock().unwrap();
        if let Some(student) = records.iter_mut().find(|s| s.student_id == student_id) {
            if let Some(name) = &patch.name {
                student.name = name.clone();
            }
            if let Some(email) = &patch.email {
                student.email = email.clone();
            }
        }
        Ok(())
    }

    async fn delete(&self, student_id: &str) -> Result<(), ApiError> {
        self.pass_gate().await;
        self.record(format!("DELETE {student_id}"))?;
        self.records
            .lock()
            .unwrap()
            .retain(|s| s.student_id != student_id);
        Ok(())
    }
}
