/// Configuration for the server, storage locations and rescheduling policy
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::timetable::CollisionPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error(
        "max_lectures_per_day = {max} needs collision_policy \"keep\"; \"replace\" allows at most 2"
    )]
    LectureCapTooHigh { max: usize },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reschedule: RescheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin allowed to call the API from a browser
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per collection
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// SQLite database holding user credentials
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleConfig {
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
    /// Entries a date may already hold and still receive an extra lecture
    /// (exclusive bound)
    #[serde(default = "default_max_lectures_per_day")]
    pub max_lectures_per_day: usize,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    5000
}
fn default_cors_origin() -> String {
    "http://localhost:5173".into()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_db_path() -> PathBuf {
    PathBuf::from("./data/users.db")
}
fn default_max_lectures_per_day() -> usize {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_path: default_db_path(),
        }
    }
}

impl Default for RescheduleConfig {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::default(),
            max_lectures_per_day: default_max_lectures_per_day(),
        }
    }
}

impl Config {
    /// Loads the config from a JSON file. A missing file yields the defaults.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON config file
    ///
    /// # Returns
    /// * `Ok(Config)` - Parsed config, with defaults for omitted fields
    /// * `Err` - If the file exists but can't be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the rescheduler can't honor.
    ///
    /// Under `replace` an extra lecture displaces the entry already on its
    /// date, so that date must hold at most one entry beforehand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let reschedule = &self.reschedule;
        if reschedule.collision_policy == CollisionPolicy::Replace
            && reschedule.max_lectures_per_day > 2
        {
            return Err(ConfigError::LectureCapTooHigh {
                max: reschedule.max_lectures_per_day,
            });
        }
        Ok(())
    }

    /// Applies `LESSONPLAN_*` environment overrides.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())?;
        Ok(self)
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(host) = var("LESSONPLAN_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("LESSONPLAN_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "LESSONPLAN_PORT",
                value: port,
            })?;
        }
        if let Some(dir) = var("LESSONPLAN_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(db) = var("LESSONPLAN_DB_PATH") {
            self.storage.db_path = PathBuf::from(db);
        }
        Ok(())
    }
}
