//! Layered server configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, the YAML file
//! given with `--config`, `SUSU__*` environment variables (`__` separates
//! nesting levels, e.g. `SUSU__DATABASE__DSN`), then CLI overrides.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use susu::config::SusuConfig;
use susu_db::DbConfig;

pub const ENV_PREFIX: &str = "SUSU__";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DbConfig,
    pub logging: LoggingConfig,
    pub susu: SusuConfig,
}

/// Values taken from the command line; each one wins over every other source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
    pub mock: bool,
}

impl AppConfig {
    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// # Errors
    /// Fails when the file is missing or unreadable, or a source does not
    /// match the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
        Self::figment(path)
            .extract()
            .context("failed to load configuration")
    }

    /// # Errors
    /// Fails when `--port` is given and `server.bind_addr` is not a socket address.
    pub fn apply_cli_overrides(&mut self, cli: CliOverrides) -> Result<()> {
        if let Some(port) = cli.port {
            let mut addr = self.bind_addr()?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }
        if let Some(level) = verbosity_level(cli.verbose) {
            level.clone_into(&mut self.logging.level);
        }
        if cli.mock {
            self.database = DbConfig::in_memory();
        }
        Ok(())
    }

    /// # Errors
    /// Fails when `server.bind_addr` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid server.bind_addr '{}'", self.server.bind_addr))
    }

    /// Check every section without touching the database.
    ///
    /// # Errors
    /// Describes the first inconsistent section.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        self.database.validate().context("invalid database section")?;
        self.susu.validate().context("invalid susu section")?;
        Ok(())
    }

    /// YAML rendering with credentials removed from the DSN.
    ///
    /// # Errors
    /// Fails if serialization fails.
    pub fn to_redacted_yaml(&self) -> Result<String> {
        let redacted = Self {
            database: self.database.redacted(),
            ..self.clone()
        };
        serde_saphyr::to_string(&redacted).context("failed to render configuration")
    }
}

fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
