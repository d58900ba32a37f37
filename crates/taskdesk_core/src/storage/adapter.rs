//! Persistence adapter mirroring tasks and categories to a key-value store.
//!
//! # Responsibility
//! - Serialize full task/category snapshots as JSON under two fixed keys.
//! - Turn every storage fault into a logged, safe fallback.
//!
//! # Invariants
//! - Save paths overwrite the whole snapshot; there are no partial writes.
//! - Load paths never fail: absent or corrupt entries yield an empty task
//!   list or the default category set.

use super::kv::KeyValueStore;
use super::StorageResult;
use crate::model::category::default_categories;
use crate::model::task::Task;
use log::{debug, error};

/// Storage key holding the JSON array of tasks.
pub const TASKS_KEY: &str = "todo-app-tasks";
/// Storage key holding the JSON array of category names.
pub const CATEGORIES_KEY: &str = "todo-app-categories";

/// Snapshot persistence used by the task store.
///
/// Implementations must not panic and must not return storage errors; the
/// store treats persistence as best-effort.
pub trait TaskPersistence {
    /// Persists the complete task collection. Returns `false` on failure.
    fn save_tasks(&mut self, tasks: &[Task]) -> bool;
    /// Loads the task collection, or an empty list when absent/corrupt.
    fn load_tasks(&self) -> Vec<Task>;
    /// Removes the stored task collection. Returns `false` on failure.
    fn clear_tasks(&mut self) -> bool;
    /// Persists the complete category list. Returns `false` on failure.
    fn save_categories(&mut self, categories: &[String]) -> bool;
    /// Loads the category list, or the defaults when absent/corrupt.
    fn load_categories(&self) -> Vec<String>;
}

/// JSON snapshot adapter over any [`KeyValueStore`].
pub struct StorageAdapter<S: KeyValueStore> {
    store: S,
    tasks_key: String,
    categories_key: String,
}

impl<S: KeyValueStore> StorageAdapter<S> {
    /// Creates an adapter using the standard storage keys.
    pub fn new(store: S) -> Self {
        Self::with_keys(store, TASKS_KEY, CATEGORIES_KEY)
    }

    /// Creates an adapter using custom storage keys.
    pub fn with_keys(
        store: S,
        tasks_key: impl Into<String>,
        categories_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            tasks_key: tasks_key.into(),
            categories_key: categories_key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tasks_key(&self) -> &str {
        &self.tasks_key
    }

    pub fn categories_key(&self) -> &str {
        &self.categories_key
    }

    /// Fallible variant of [`TaskPersistence::save_tasks`].
    pub fn try_save_tasks(&mut self, tasks: &[Task]) -> StorageResult<()> {
        let encoded = serde_json::to_string(tasks)?;
        self.store.set(&self.tasks_key, &encoded)
    }

    /// Fallible variant of [`TaskPersistence::load_tasks`]; `None` when absent.
    pub fn try_load_tasks(&self) -> StorageResult<Option<Vec<Task>>> {
        match self.store.get(&self.tasks_key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Fallible variant of [`TaskPersistence::save_categories`].
    pub fn try_save_categories(&mut self, categories: &[String]) -> StorageResult<()> {
        let encoded = serde_json::to_string(categories)?;
        self.store.set(&self.categories_key, &encoded)
    }

    /// Fallible variant of [`TaskPersistence::load_categories`]; `None` when absent.
    pub fn try_load_categories(&self) -> StorageResult<Option<Vec<String>>> {
        match self.store.get(&self.categories_key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}

impl<S: KeyValueStore> TaskPersistence for StorageAdapter<S> {
    fn save_tasks(&mut self, tasks: &[Task]) -> bool {
        match self.try_save_tasks(tasks) {
            Ok(()) => {
                debug!(
                    "event=tasks_save module=storage status=ok key={} count={}",
                    self.tasks_key,
                    tasks.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=tasks_save module=storage status=error key={} count={} error={}",
                    self.tasks_key,
                    tasks.len(),
                    err
                );
                false
            }
        }
    }

    fn load_tasks(&self) -> Vec<Task> {
        match self.try_load_tasks() {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(err) => {
                error!(
                    "event=tasks_load module=storage status=error key={} fallback=empty error={}",
                    self.tasks_key, err
                );
                Vec::new()
            }
        }
    }

    fn clear_tasks(&mut self) -> bool {
        match self.store.remove(&self.tasks_key) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=tasks_clear module=storage status=error key={} error={}",
                    self.tasks_key, err
                );
                false
            }
        }
    }

    fn save_categories(&mut self, categories: &[String]) -> bool {
        match self.try_save_categories(categories) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=categories_save module=storage status=error key={} error={}",
                    self.categories_key, err
                );
                false
            }
        }
    }

    fn load_categories(&self) -> Vec<String> {
        match self.try_load_categories() {
            Ok(Some(categories)) => categories,
            Ok(None) => default_categories(),
            Err(err) => {
                error!(
                    "event=categories_load module=storage status=error key={} fallback=defaults error={}",
                    self.categories_key, err
                );
                default_categories()
            }
        }
    }
}
