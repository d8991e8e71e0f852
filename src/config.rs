//! Layered runtime configuration.
//!
//! Values are read from built-in defaults, an optional TOML file, and
//! `STATEWARD__*` environment variables, in increasing precedence. Nested
//! keys use a double underscore, so `STATEWARD__DATABASE__URL` sets
//! `database.url`. `STATEWARD__LIFECYCLE__ENABLED_SERVICES` is parsed as a
//! comma-separated list.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const ENV_PREFIX: &str = "STATEWARD";
const ENV_SEPARATOR: &str = "__";
const ENABLED_SERVICES_KEY: &str = "lifecycle.enabled_services";

/// Top-level settings for the lifecycle engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Task lifecycle behaviour.
    pub lifecycle: LifecycleConfig,
    /// `PostgreSQL` connection settings.
    pub database: DatabaseConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Task lifecycle behaviour, fixed for the lifetime of the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Service kinds accepted in a request's `service.type`.
    pub enabled_services: Vec<String>,
}

impl LifecycleConfig {
    /// Creates a configuration enabling the given service kinds.
    #[must_use]
    pub fn with_enabled_services<I, S>(services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled_services: services.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` when `kind` is one of the enabled service kinds.
    #[must_use]
    pub fn is_enabled(&self, kind: &str) -> bool {
        self.enabled_services.iter().any(|enabled| enabled == kind)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::with_enabled_services(["http"])
    }
}

/// `PostgreSQL` connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/stateward".to_owned(),
            max_connections: 10,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

/// Errors returned while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or the merged values do not deserialize.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

impl Settings {
    /// Loads settings from defaults, an optional TOML file, and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when the file is missing or invalid,
    /// or when a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Self::defaults()?;
        if let Some(file) = path {
            builder = builder.add_source(File::from(file).format(FileFormat::Toml).required(true));
        }
        let merged = builder.add_source(Self::environment()).build()?;
        Ok(merged.try_deserialize()?)
    }

    /// Parses settings from TOML text layered over the defaults.
    ///
    /// The environment is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when the text is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml(source: &str) -> Result<Self, SettingsError> {
        let merged = Self::defaults()?
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Ok(merged.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, SettingsError> {
        let lifecycle = LifecycleConfig::default();
        let database = DatabaseConfig::default();
        let logging = LoggingConfig::default();
        Ok(Config::builder()
            .set_default(ENABLED_SERVICES_KEY, lifecycle.enabled_services)?
            .set_default("database.url", database.url)?
            .set_default("database.max_connections", i64::from(database.max_connections))?
            .set_default("logging.filter", logging.filter)?
            .set_default("logging.json", logging.json)?)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .list_separator(",")
            .with_list_parse_key(ENABLED_SERVICES_KEY)
            .try_parsing(true)
    }
}
