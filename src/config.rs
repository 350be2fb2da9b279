//! Seeder configuration
//!
//! Defaults match the development container: an ArangoDB server on
//! `localhost:8529`, user `root`, target database `project_graph` created
//! with a `root` / `arango2rdb` bootstrap user. A YAML file can override
//! any subset of the fields.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{is_valid_database_name, DatabaseUser};

/// Database the sample data is seeded into
pub const DEFAULT_DATABASE: &str = "project_graph";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Connection settings for the ArangoDB server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArangoConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Target database
    pub database: String,
    pub use_ssl: bool,
}

impl Default for ArangoConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8529,
            user: "root".to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            use_ssl: false,
        }
    }
}

impl ArangoConfig {
    /// Base URL of the HTTP API, e.g. `http://localhost:8529`
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// Complete seeder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub arango: ArangoConfig,
    /// User created together with the target database
    pub bootstrap_user: DatabaseUser,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            arango: ArangoConfig::default(),
            bootstrap_user: DatabaseUser::new("root", "arango2rdb"),
        }
    }
}

impl SeedConfig {
    /// Load from a YAML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Parse YAML; missing fields keep their defaults
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.arango.host.trim().is_empty() {
            return Err(ConfigError::Invalid("ArangoDB host is required".to_string()));
        }
        if self.arango.port == 0 {
            return Err(ConfigError::Invalid("ArangoDB port must not be 0".to_string()));
        }
        if self.arango.database.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ArangoDB database name is required".to_string(),
            ));
        }
        if !is_valid_database_name(&self.arango.database) {
            return Err(ConfigError::Invalid(format!(
                "illegal database name: {}",
                self.arango.database
            )));
        }
        if self.bootstrap_user.username.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "bootstrap username is required".to_string(),
            ));
        }
        Ok(())
    }
}
