//! Core configuration and store bootstrap.
//!
//! # Responsibility
//! - Describe where the store lives, which keys it uses and how it logs.
//! - Wire logging, SQLite storage, the adapter and the task store together.
//!
//! # Invariants
//! - The tasks key and the categories key are non-empty and distinct.
//! - A returned store has already loaded persisted state.

use crate::db::DbError;
use crate::logging::{default_log_level, init_logging, LoggingError};
use crate::service::task_store::TaskStore;
use crate::storage::adapter::{StorageAdapter, CATEGORIES_KEY, TASKS_KEY};
use crate::storage::kv::SqliteKvStore;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Task store backed by the SQLite key-value store.
pub type SqliteTaskStore = TaskStore<StorageAdapter<SqliteKvStore>>;

/// Configuration or bootstrap failure.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
    Logging(LoggingError),
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Core settings. Every field has a default, so `{}` is a valid document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite store file; `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    /// Log level; falls back to [`default_log_level`].
    pub log_level: Option<String>,
    /// Absolute log directory; `None` leaves logging to the host.
    pub log_dir: Option<PathBuf>,
    pub tasks_key: String,
    pub categories_key: String,
    /// Per-entry size quota for stored snapshots.
    pub max_value_bytes: Option<usize>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: None,
            log_dir: None,
            tasks_key: TASKS_KEY.to_string(),
            categories_key: CATEGORIES_KEY.to_string(),
            max_value_bytes: None,
        }
    }
}

impl CoreConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON config document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tasks_key.trim().is_empty() || self.categories_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage keys must not be empty".to_string(),
            ));
        }
        if self.tasks_key == self.categories_key {
            return Err(ConfigError::Invalid(format!(
                "tasks_key and categories_key must differ, both are `{}`",
                self.tasks_key
            )));
        }
        if self.max_value_bytes == Some(0) {
            return Err(ConfigError::Invalid(
                "max_value_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

/// Builds an initialized SQLite-backed task store from `config`.
///
/// # Errors
/// - `Invalid` when the config fails validation.
/// - `Logging` when `log_dir` is set and logging cannot start.
/// - `Db` when the store file cannot be opened or migrated.
pub fn open_task_store(config: &CoreConfig) -> Result<SqliteTaskStore, ConfigError> {
    config.validate()?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(config.effective_log_level(), log_dir)?;
    }

    let mut kv = match &config.db_path {
        Some(path) => SqliteKvStore::open(path)?,
        None => SqliteKvStore::open_in_memory()?,
    };
    if let Some(limit) = config.max_value_bytes {
        kv = kv.with_max_value_bytes(limit);
    }

    let adapter = StorageAdapter::with_keys(kv, &config.tasks_key, &config.categories_key);
    let mut store = TaskStore::new(adapter);
    store.initialize();
    info!(
        "event=store_open module=config status=ok mode={}",
        if config.db_path.is_some() { "file" } else { "memory" }
    );
    Ok(store)
}
