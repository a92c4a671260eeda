//! Configuration Management
//!
//! Connection parameters for the store come from a JSON config file, then
//! command-line flags / environment variables layered on top.
//!
//! # Configuration Locations
//! - Explicit: `--config PATH` (must exist)
//! - Local: `.employee-tracker/config.json` (per working directory)
//! - Global: `<config_dir>/employee-tracker/config.json` (per user)
//!
//! The first file found wins; without any file the built-in defaults are used
//! (PostgreSQL on `localhost:5432`, user `postgres`, database `employee_db`).
//!
//! # Resolution Precedence
//! 1. Overrides (`--db-host`, `TRACKER_DB_HOST`, ...)
//! 2. `password_env` from the file (password read from that variable)
//! 3. Connection fields stored in the file
//!
//! Example file:
//! ```json
//! {
//!   "engine": "postgres",
//!   "host": "localhost",
//!   "port": 5432,
//!   "user": "tracker",
//!   "password_env": "TRACKER_PASSWORD",
//!   "database": "employee_db",
//!   "init_schema": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TrackerError};
use crate::store::{ConnectionConfig, DatabaseType};

/// Directory name used under the user config dir
pub const APP_DIR_NAME: &str = "employee-tracker";

/// Directory name used for the local (per working directory) config
pub const LOCAL_DIR_NAME: &str = ".employee-tracker";

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_USER: &str = "postgres";
pub const DEFAULT_DATABASE: &str = "employee_db";

/// Contents of a tracker config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Connection configuration
    #[serde(flatten)]
    pub connection: ConnectionConfig,

    /// Environment variable holding the password (instead of storing it in the file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Create the tables at startup if they do not exist
    #[serde(default)]
    pub init_schema: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::postgres(
                DEFAULT_HOST.to_string(),
                DEFAULT_PORT,
                DEFAULT_USER.to_string(),
                None,
                DEFAULT_DATABASE.to_string(),
            ),
            password_env: None,
            init_schema: false,
        }
    }
}

impl TrackerConfig {
    /// Produce the final connection config: `password_env`, then overrides, then validation
    pub fn resolve(&self, overrides: &ConnectionOverrides) -> Result<ConnectionConfig> {
        let mut config = self.connection.clone();

        if let Some(env_var) = &self.password_env {
            match std::env::var(env_var) {
                Ok(password) => config.password = Some(password),
                Err(_) => {
                    return Err(TrackerError::config_error(format!(
                        "Environment variable {env_var} not found for password"
                    )));
                }
            }
        }

        overrides.apply(&mut config);
        validate_connection(&config)?;
        Ok(config)
    }
}

/// Per-field connection overrides from flags or environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub engine: Option<DatabaseType>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub file: Option<PathBuf>,
}

impl ConnectionOverrides {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overwrite every field of `config` that has an override
    pub fn apply(&self, config: &mut ConnectionConfig) {
        if let Some(engine) = self.engine {
            config.engine = engine;
        }
        if let Some(host) = &self.host {
            config.host = Some(host.clone());
        }
        if let Some(port) = self.port {
            config.port = Some(port);
        }
        if let Some(user) = &self.user {
            config.user = Some(user.clone());
        }
        if let Some(password) = &self.password {
            config.password = Some(password.clone());
        }
        if let Some(database) = &self.database {
            config.database = Some(database.clone());
        }
        if let Some(file) = &self.file {
            config.file = Some(file.clone());
        }
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config PATH`
    Explicit(PathBuf),
    /// `.employee-tracker/config.json`
    Local(PathBuf),
    /// `<config_dir>/employee-tracker/config.json`
    Global(PathBuf),
    /// No file found
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "explicit config {}", path.display()),
            Self::Local(path) => write!(f, "local config {}", path.display()),
            Self::Global(path) => write!(f, "global config {}", path.display()),
            Self::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Get path to local config file (`.employee-tracker/config.json`)
pub fn local_config_path() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().map_err(|e| {
        TrackerError::config_error(format!("Could not determine current directory: {e}"))
    })?;

    Ok(current_dir.join(LOCAL_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Get path to global config file, if the platform has a config directory
#[must_use]
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Read and parse one config file
pub fn read_config_file(path: &Path) -> Result<TrackerConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        TrackerError::config_error(format!("Could not read config file {}: {e}", path.display()))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        TrackerError::config_error(format!("Invalid config file {}: {e}", path.display()))
    })
}

/// Load configuration following the lookup order
///
/// An explicit path must exist; local and global files are optional.
pub fn load_config(explicit: Option<&Path>) -> Result<(TrackerConfig, ConfigSource)> {
    load_config_from(explicit, Some(local_config_path()?), global_config_path())
}

fn load_config_from(
    explicit: Option<&Path>,
    local: Option<PathBuf>,
    global: Option<PathBuf>,
) -> Result<(TrackerConfig, ConfigSource)> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(TrackerError::config_error(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok((read_config_file(path)?, ConfigSource::Explicit(path.to_path_buf())));
    }

    if let Some(path) = local.filter(|p| p.exists()) {
        return Ok((read_config_file(&path)?, ConfigSource::Local(path)));
    }

    if let Some(path) = global.filter(|p| p.exists()) {
        return Ok((read_config_file(&path)?, ConfigSource::Global(path)));
    }

    Ok((TrackerConfig::default(), ConfigSource::Defaults))
}

/// Check that a connection config has everything its engine needs
pub fn validate_connection(config: &ConnectionConfig) -> Result<()> {
    fn present(value: Option<&String>) -> bool {
        value.is_some_and(|v| !v.trim().is_empty())
    }

    match config.engine {
        DatabaseType::Postgres => {
            let mut missing = Vec::new();
            if !present(config.host.as_ref()) {
                missing.push("host");
            }
            if config.port.is_none() {
                missing.push("port");
            }
            if !present(config.user.as_ref()) {
                missing.push("user");
            }
            if !present(config.database.as_ref()) {
                missing.push("database");
            }

            if !missing.is_empty() {
                return Err(TrackerError::config_error(format!(
                    "PostgreSQL connection is missing: {}",
                    missing.join(", ")
                )));
            }
        }
        DatabaseType::SQLite => {
            if config.file.as_ref().map_or(true, |f| f.as_os_str().is_empty()) {
                return Err(TrackerError::config_error("SQLite requires 'file' parameter"));
            }
        }
    }
    Ok(())
}
