use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// Endpoint used when nothing overrides it.
pub const DEFAULT_API_BASE: &str = "https://mtb2dyjd62.execute-api.us-east-1.amazonaws.com/default";

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

/// Prefix for environment overrides, e.g. `ROSTER__API__BASE_URL`.
pub const ENV_PREFIX: &str = "ROSTER__";

/// Remote students API settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL; `/students` is appended by the client
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_API_BASE),
        }
    }
}

/// Terminal UI settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TuiConfig {
    /// Interval between tick events
    #[serde(with = "humantime_serde")]
    pub tick_rate: Duration,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_secs(5),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Configuration {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Terminal UI configuration
    #[serde(default)]
    pub tui: TuiConfig,
}

impl Configuration {
    /// Load defaults, then `roster.toml`, then `ROSTER__*` environment variables.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(DEFAULT_CONFIG_FILE))
            .extract()
            .map_err(Box::new)
    }

    /// Like [`Configuration::load`] but reading the given file instead of `roster.toml`.
    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(path)).extract().map_err(Box::new)
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Apply a base URL given on the command line or via `ROSTER_API_BASE`.
    pub fn with_api_base(mut self, base_url: Option<&str>) -> Self {
        if let Some(base_url) = base_url {
            self.api.base_url = base_url.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
        assert_eq!(config.tui.tick_rate, Duration::from_secs(5));
    }

    #[test]
    fn test_configless_operation() {
        Jail::expect_with(|_jail| {
            let config = Configuration::load().map_err(|e| *e)?;
            assert_eq!(config, Configuration::default());
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "roster.toml",
                r#"
                [api]
                base_url = "http://localhost:3000"

                [tui]
                tick_rate = "250ms"
                "#,
            )?;

            let config = Configuration::load().map_err(|e| *e)?;
            assert_eq!(config.api.base_url, "http://localhost:3000");
            assert_eq!(config.tui.tick_rate, Duration::from_millis(250));
            Ok(())
        });
    }

    #[test]
    fn test_env_var_override() {
        Jail::expect_with(|jail| {
            jail.create_file("roster.toml", "[api]\nbase_url = \"http://from-file\"\n")?;
            jail.set_env("ROSTER__API__BASE_URL", "http://from-env:8080");

            let config = Configuration::load().map_err(|e| *e)?;
            assert_eq!(config.api.base_url, "http://from-env:8080");
            Ok(())
        });
    }

    #[test]
    fn test_load_from_explicit_path() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[tui]\ntick_rate = \"2s\"\n")?;

            let config = Configuration::load_from_path(Path::new("custom.toml")).map_err(|e| *e)?;
            assert_eq!(config.tui.tick_rate, Duration::from_secs(2));
            assert_eq!(config.api.base_url, DEFAULT_API_BASE);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_duration_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("roster.toml", "[tui]\ntick_rate = \"soon\"\n")?;
            assert!(Configuration::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_cli_override_wins() {
        let config = Configuration::default().with_api_base(Some("http://cli"));
        assert_eq!(config.api.base_url, "http://cli");

        let config = Configuration::default().with_api_base(None);
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
    }
}
