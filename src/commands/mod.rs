pub mod student;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::cli::{CommonArgs, CommonCommands, LogSink, utils};
use roster_client::{HttpStudentsApi, StudentsClient};

use crate::tui::app::App;

/// File the TUI appends logs to when `--verbose` is given.
const TUI_LOG_FILE: &str = "roster.log";

/// Roster: browse and manage students over the students REST API
#[derive(Parser, Debug)]
#[command(name = "roster", version, about)]
pub struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Students API base URL (overrides configuration)
    #[arg(long, global = true, env = "ROSTER_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Interactive terminal UI (default)
    Tui,
    #[command(flatten)]
    Student(student::StudentCommand),
    #[command(flatten)]
    Common(CommonCommands),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Commands::Tui);

        let sink = match (&command, self.common.verbose) {
            (Commands::Tui, true) => LogSink::File(PathBuf::from(TUI_LOG_FILE)),
            (Commands::Tui, false) => LogSink::Off,
            _ => LogSink::Stderr,
        };
        utils::init_logging(&self.common, sink)?;

        let config = utils::load_config(self.common.config.as_ref())?
            .with_api_base(self.api_base.as_deref());

        match command {
            Commands::Common(cmd) => utils::handle_common_command(&cmd, &config),
            Commands::Tui => {
                let api = HttpStudentsApi::new(&config.api.base_url)?;
                let endpoint = api.endpoint().to_string();
                log::info!("Starting TUI against {endpoint}");
                let mut app = App::new(api, endpoint, config.tui.tick_rate);
                app.run().await
            }
            Commands::Student(cmd) => {
                let api = HttpStudentsApi::new(&config.api.base_url)?;
                let mut client = StudentsClient::new(api);
                cmd.run(&mut client).await
            }
        }
    }
}
