use std::io::{self, BufRead, BufReader, Write};

use clap::Subcommand;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use roster_client::{
    ClientState, DeleteConfirmation, DeleteTarget, Outcome, Student, StudentFields, StudentsApi,
    StudentsClient,
};

#[derive(Subcommand, Debug, Clone)]
pub enum StudentCommand {
    /// Fetch and print all students
    List {
        #[arg(long, help = "Print records as JSON")]
        json: bool,
    },
    /// Fetch, then print the students matching a query
    Search {
        /// Case-insensitive text matched against id, name and email
        query: String,
        #[arg(long, help = "Print records as JSON")]
        json: bool,
    },
    /// Create a student
    Add {
        /// Student ID
        student_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Change a student's name and/or email
    Update {
        /// Student ID
        student_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a student
    Delete {
        /// Student ID
        student_id: String,
        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

impl StudentCommand {
    pub async fn run<A: StudentsApi>(self, client: &mut StudentsClient<A>) -> anyhow::Result<()> {
        let mut prompt = Prompt::new(BufReader::new(io::stdin()), io::stderr());
        let mut stdout = io::stdout();
        self.execute(client, &mut prompt, &mut stdout).await
    }

    /// Run against explicit confirmation and output streams.
    pub async fn execute<A, C, W>(
        self,
        client: &mut StudentsClient<A>,
        confirmation: &mut C,
        out: &mut W,
    ) -> anyhow::Result<()>
    where
        A: StudentsApi,
        C: DeleteConfirmation + ?Sized,
        W: Write,
    {
        match self {
            StudentCommand::List { json } => {
                ensure_success(client.list().await, client.state())?;
                let records: Vec<&Student> = client.state().records.iter().collect();
                print_records(out, &records, json)?;
                if !json {
                    writeln!(out, "{}", client.state().last_message)?;
                }
            }
            StudentCommand::Search { query, json } => {
                ensure_success(client.list().await, client.state())?;
                client.state_mut().search_query = query;
                let records = client.state().visible_records();
                print_records(out, &records, json)?;
                if !json {
                    writeln!(
                        out,
                        "{} of {} student(s) match.",
                        records.len(),
                        client.state().records.len()
                    )?;
                }
            }
            StudentCommand::Add {
                student_id,
                name,
                email,
            } => {
                let outcome = client.add(StudentFields::new(student_id, name, email)).await;
                ensure_success(outcome, client.state())?;
                writeln!(out, "Student added.")?;
                warn_on_refresh_failure(client.state());
            }
            StudentCommand::Update {
                student_id,
                name,
                email,
            } => {
                let outcome = client
                    .update(
                        &student_id,
                        name.as_deref().unwrap_or_default(),
                        email.as_deref().unwrap_or_default(),
                    )
                    .await;
                ensure_success(outcome, client.state())?;
                writeln!(out, "Student updated.")?;
                warn_on_refresh_failure(client.state());
            }
            StudentCommand::Delete { student_id, yes } => {
                let target = DeleteTarget::Row(student_id.clone());
                let outcome = if yes {
                    client.delete(target, &mut |_: &str| true).await
                } else {
                    client.delete(target, confirmation).await
                };
                if outcome == Outcome::Declined {
                    writeln!(out, "Deletion cancelled.")?;
                    return Ok(());
                }
                ensure_success(outcome, client.state())?;
                writeln!(out, "Deleted {}.", student_id.trim())?;
                warn_on_refresh_failure(client.state());
            }
        }
        Ok(())
    }
}

/// Turn a failed or rejected operation into the error `main` reports.
fn ensure_success(outcome: Outcome, state: &ClientState) -> anyhow::Result<()> {
    match outcome {
        Outcome::Succeeded | Outcome::Declined => Ok(()),
        Outcome::Failed | Outcome::Rejected => anyhow::bail!("{}", state.last_error),
    }
}

/// The mutation went through but the follow-up list fetch did not.
fn warn_on_refresh_failure(state: &ClientState) {
    if !state.last_error.is_empty() {
        eprintln!("Warning: {}", state.last_error);
    }
}

fn print_records<W: Write>(out: &mut W, records: &[&Student], json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(records)?)?;
    } else if records.is_empty() {
        writeln!(out, "No students found.")?;
    } else {
        writeln!(out, "{}", render_table(records))?;
    }
    Ok(())
}

pub fn render_table(records: &[&Student]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Student ID", "Name", "Email"]);
    for student in records {
        table.add_row(vec![
            student.student_id.as_str(),
            student.name.as_str(),
            student.email.as_str(),
        ]);
    }
    table.to_string()
}

/// `[y/N]` prompt read from a line-oriented input.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> DeleteConfirmation for Prompt<R, W> {
    fn confirm_delete(&mut self, student_id: &str) -> bool {
        let asked = write!(self.output, "Delete student {student_id}? [y/N] ")
            .and_then(|()| self.output.flush());
        if let Err(e) = asked {
            log::warn!("Failed to show confirmation prompt: {e}");
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                log::warn!("Failed to read confirmation: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use mockito::{Matcher, Server};
    use roster_client::HttpStudentsApi;

    use super::*;

    const LIST_BODY: &str = r#"[
        {"studentId":"S1","name":"Alice","email":"alice@x.com"},
        {"studentId":"S2","name":"Bob","email":"bob@y.com"}
    ]"#;

    fn client_for(server: &Server) -> StudentsClient<HttpStudentsApi> {
        StudentsClient::new(HttpStudentsApi::new(&server.url()).unwrap())
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn prompt_accepts_yes() {
        let mut err = Vec::new();
        let mut prompt = Prompt::new(Cursor::new("y\n"), &mut err);
        assert!(prompt.confirm_delete("S1"));
        assert!(output(err).contains("Delete student S1? [y/N]"));

        let mut prompt = Prompt::new(Cursor::new("YES\n"), Vec::new());
        assert!(prompt.confirm_delete("S1"));
    }

    #[test]
    fn prompt_defaults_to_no() {
        let mut prompt = Prompt::new(Cursor::new("\n"), Vec::new());
        assert!(!prompt.confirm_delete("S1"));

        let mut prompt = Prompt::new(Cursor::new(""), Vec::new());
        assert!(!prompt.confirm_delete("S1"));
    }

    /// Accepts writes but fails to flush them.
    struct UnflushedOutput;

    impl Write for UnflushedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn prompt_declines_when_it_cannot_be_shown() {
        let mut prompt = Prompt::new(Cursor::new("y\n"), UnflushedOutput);
        assert!(!prompt.confirm_delete("S1"));
    }

    #[test]
    fn table_lists_every_record() {
        let a = Student::new("S1", "Alice", "alice@x.com");
        let b = Student::new("S2", "Bob", "bob@y.com");
        let table = render_table(&[&a, &b]);
        assert!(table.contains("Student ID"));
        assert!(table.contains("alice@x.com"));
        assert!(table.contains("Bob"));
    }

    #[tokio::test]
    async fn list_prints_table_and_count() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/students")
            .with_status(200)
            .with_body(LIST_BODY)
            .create_async()
            .await;

        let mut client = client_for(&server);
        let mut out = Vec::new();
        StudentCommand::List { json: false }
            .execute(&mut client, &mut |_: &str| false, &mut out)
            .await
            .unwrap();

        let out = output(out);
        assert!(out.contains("Alice"));
        assert!(out.contains("Loaded 2 student(s)."));
    }

    #[tokio::test]
    async fn search_json_prints_only_matches() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/students")
            .with_status(200)
            .with_body(LIST_BODY)
            .create_async()
            .await;

        let mut client = client_for(&server);
        let mut out = Vec::new();
        StudentCommand::Search {
            query: "BOB".into(),
            json: true,
        }
        .execute(&mut client, &mut |_: &str| false, &mut out)
        .await
        .unwrap();

        let printed: Vec<Student> = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(printed, vec![Student::new("S2", "Bob", "bob@y.com")]);
    }

    #[tokio::test]
    async fn list_failure_becomes_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/students")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let mut client = client_for(&server);
        let err = StudentCommand::List { json: false }
            .execute(&mut client, &mut |_: &str| false, &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Fetch failed (HTTP 500)");
    }

    #[tokio::test]
    async fn add_with_blank_field_is_rejected_without_request() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/students")
            .expect(0)
            .create_async()
            .await;

        let mut client = client_for(&server);
        let err = StudentCommand::Add {
            student_id: "S3".into(),
            name: " ".into(),
            email: "c@x.com".into(),
        }
        .execute(&mut client, &mut |_: &str| false, &mut Vec::new())
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Add: studentId, name, and email are required."
        );
        create.assert_async().await;
    }

    #[tokio::test]
    async fn update_sends_only_given_fields() {
        let mut server = Server::new_async().await;
        let update = server
            .mock("PUT", "/students/S2")
            .match_body(Matcher::JsonString(r#"{"email":"new@x.com"}"#.into()))
            .with_status(200)
            .create_async()
            .await;
        let _list = server
            .mock("GET", "/students")
            .with_status(200)
            .with_body(LIST_BODY)
            .create_async()
            .await;

        let mut client = client_for(&server);
        let mut out = Vec::new();
        StudentCommand::Update {
            student_id: "S2".into(),
            name: None,
            email: Some("new@x.com".into()),
        }
        .execute(&mut client, &mut |_: &str| false, &mut out)
        .await
        .unwrap();

        update.assert_async().await;
        assert!(output(out).contains("Student updated."));
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing_and_succeeds() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", "/students/S1")
            .expect(0)
            .create_async()
            .await;

        let mut client = client_for(&server);
        let mut prompt = Prompt::new(Cursor::new("n\n"), Vec::new());
        let mut out = Vec::new();
        StudentCommand::Delete {
            student_id: "S1".into(),
            yes: false,
        }
        .execute(&mut client, &mut prompt, &mut out)
        .await
        .unwrap();

        delete.assert_async().await;
        assert!(output(out).contains("Deletion cancelled."));
    }

    #[tokio::test]
    async fn delete_with_yes_skips_prompt() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", "/students/S1")
            .with_status(200)
            .create_async()
            .await;
        let _list = server
            .mock("GET", "/students")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let mut client = client_for(&server);
        let mut out = Vec::new();
        StudentCommand::Delete {
            student_id: "S1".into(),
            yes: true,
        }
        .execute(&mut client, &mut |_: &str| false, &mut out)
        .await
        .unwrap();

        delete.assert_async().await;
        assert!(output(out).contains("Deleted S1."));
    }

    #[tokio::test]
    async fn delete_failure_surfaces_status_and_body() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", "/students/S1")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let mut client = client_for(&server);
        let err = StudentCommand::Delete {
            student_id: "S1".into(),
            yes: true,
        }
        .execute(&mut client, &mut |_: &str| false, &mut Vec::new())
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Delete failed (HTTP 404): not found");
    }
}
