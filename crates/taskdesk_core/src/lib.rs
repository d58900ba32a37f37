//! Core domain logic for the taskdesk task list.
//! This crate is the single source of truth for task and category invariants.

pub mod config;
pub mod db;
pub mod format;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod transfer;

pub use config::{open_task_store, ConfigError, CoreConfig, SqliteTaskStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{DEFAULT_CATEGORIES, FALLBACK_CATEGORY};
pub use model::filter::{CategoryFilter, StatusFilter, TaskFilter};
pub use model::task::{NewTask, Task, TaskId, TaskUpdate, TaskValidationError};
pub use service::helpers::{IdGenerator, TaskStats, UuidIdGenerator};
pub use service::task_store::{ImportSummary, StoreError, StoreResult, TaskStore};
pub use storage::adapter::{StorageAdapter, TaskPersistence, CATEGORIES_KEY, TASKS_KEY};
pub use storage::kv::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use storage::{StorageError, StorageResult};
pub use transfer::{ExportError, ImportError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
