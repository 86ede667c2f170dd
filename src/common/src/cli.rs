use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Common CLI arguments shared by every roster command
#[derive(Parser, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Enable quiet mode (minimal output)")]
    pub quiet: bool,
}

/// Subcommands that only inspect configuration
#[derive(Subcommand, Debug, Clone)]
pub enum CommonCommands {
    /// Show current configuration and exit
    Config {
        #[arg(long, help = "Show configuration in JSON format")]
        json: bool,
    },
    /// Validate configuration and exit
    Validate,
    /// Show version information and exit
    Version,
}

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Standard error, for one-shot commands
    Stderr,
    /// Append to a file, for the full-screen UI
    File(PathBuf),
    /// No logging at all
    Off,
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::config::Configuration;
    use anyhow::{Context, Result};
    use std::fs::OpenOptions;
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;

    /// Log level implied by `-q`/`-v`
    pub fn log_level(args: &CommonArgs) -> &'static str {
        if args.quiet {
            "warn"
        } else if args.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Initialize logging based on CLI arguments; `RUST_LOG` wins when set.
    pub fn init_logging(args: &CommonArgs, sink: LogSink) -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_level(args)));

        let result = match sink {
            LogSink::Off => return Ok(()),
            LogSink::Stderr => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            LogSink::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("Failed to open log file {}", path.display()))?;
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init()
            }
        };

        result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
    }

    /// Load configuration with optional override from CLI
    pub fn load_config(config_path: Option<&PathBuf>) -> Result<Configuration> {
        match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Configuration::load_from_path(path).context("Failed to load configuration")
            }
            None => Configuration::load().context("Failed to load configuration"),
        }
    }

    /// Display configuration in human-readable or JSON format
    pub fn display_config(config: &Configuration, json: bool) -> Result<()> {
        if json {
            let json = serde_json::to_string_pretty(config)
                .context("Failed to serialize configuration to JSON")?;
            println!("{json}");
        } else {
            println!("Roster Configuration:");
            println!("=====================");
            println!("API base URL: {}", config.api.base_url);
            println!("TUI tick rate: {:?}", config.tui.tick_rate);
        }
        Ok(())
    }

    /// Validate configuration and report any issues
    pub fn validate_config(config: &Configuration) -> Result<()> {
        log::info!("Validating configuration...");

        let base_url = config.api.base_url.trim();
        if base_url.is_empty() {
            anyhow::bail!("API base URL cannot be empty");
        }

        let parsed = url::Url::parse(base_url)
            .with_context(|| format!("API base URL is not a valid URL: {base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            );
        }

        if config.tui.tick_rate.is_zero() {
            anyhow::bail!("TUI tick rate must be greater than zero");
        }

        log::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Handle commands that only inspect configuration
    pub fn handle_common_command(command: &CommonCommands, config: &Configuration) -> Result<()> {
        match command {
            CommonCommands::Config { json } => display_config(config, *json),
            CommonCommands::Validate => {
                validate_config(config)?;
                println!("Configuration is valid.");
                Ok(())
            }
            CommonCommands::Version => {
                println!("{}", version_info());
                Ok(())
            }
        }
    }

    /// Standard version information
    pub fn version_info() -> String {
        format!(
            "{} {} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_RUST_VERSION")
        )
    }
}
