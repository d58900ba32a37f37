//! Persistence layer for the task and category collections.
//!
//! # Responsibility
//! - Define the key-value store contract and its SQLite / in-memory backends.
//! - Mirror task and category snapshots to two fixed keys.
//!
//! # Invariants
//! - The adapter never validates or mutates domain data; it only mirrors it.
//! - Storage faults never escape the adapter as errors; they become logged
//!   fallbacks (`false` on save, empty/default collections on load).

pub mod adapter;
pub mod kv;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Low-level storage fault.
#[derive(Debug)]
pub enum StorageError {
    /// Backend database failure (store unavailable, I/O, locked).
    Db(DbError),
    /// Snapshot could not be encoded or a stored value could not be decoded.
    Serialization(serde_json::Error),
    /// Value exceeds the configured per-entry size limit.
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid stored value: {err}"),
            Self::QuotaExceeded { key, size, limit } => write!(
                f,
                "value for `{key}` is {size} bytes, exceeding the {limit} byte quota"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::QuotaExceeded { .. } => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
