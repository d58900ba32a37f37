//! Task store: the single source of truth for tasks and categories.
//!
//! # Responsibility
//! - Own the in-memory task and category collections.
//! - Validate and apply CRUD mutations, then persist the new snapshot.
//! - Expose derived views (filtered lists, statistics) as recomputation.
//!
//! # Invariants
//! - Task ids are unique within the collection and never rewritten.
//! - Default categories are always present and cannot be removed.
//! - Every successful mutation triggers exactly one snapshot save; failed
//!   operations leave state untouched and never persist.
//! - Persistence failures are logged and never roll back memory state.
//! - Removing a category leaves tasks that reference it unchanged.

use crate::model::category::{
    default_categories, is_default_category, normalize_categories, FALLBACK_CATEGORY,
};
use crate::model::filter::{CategoryFilter, StatusFilter, TaskFilter};
use crate::model::task::{NewTask, Task, TaskId, TaskUpdate, TaskValidationError};
use crate::service::helpers::{
    apply_filter, calculate_stats, completion_rate, normalize_title, IdGenerator, TaskStats,
    UuidIdGenerator,
};
use crate::storage::adapter::TaskPersistence;
use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, info, warn};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_ID_ATTEMPTS: usize = 8;

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejection returned by store operations. State is unchanged when returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Task input failed validation (for example a blank title).
    Validation(TaskValidationError),
    TaskNotFound(TaskId),
    EmptyCategoryName,
    DuplicateCategory(String),
    CategoryNotFound(String),
    /// Default categories cannot be removed.
    ProtectedCategory(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::EmptyCategoryName => write!(f, "category name is required"),
            Self::DuplicateCategory(name) => write!(f, "category already exists: {name}"),
            Self::CategoryNotFound(name) => write!(f, "category not found: {name}"),
            Self::ProtectedCategory(name) => {
                write!(f, "default category cannot be removed: {name}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Outcome of merging imported task records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Elements that did not decode, failed validation or reused an id.
    pub skipped: usize,
}

/// In-memory task store with injectable persistence, ids and clock.
pub struct TaskStore<P: TaskPersistence> {
    persistence: P,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    tasks: Vec<Task>,
    categories: Vec<String>,
    filter: TaskFilter,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Creates an empty store with UUID ids and the system clock.
    ///
    /// Call [`TaskStore::initialize`] to load persisted state.
    pub fn new(persistence: P) -> Self {
        Self {
            persistence,
            ids: Box::new(UuidIdGenerator),
            clock: Box::new(DefaultClock),
            tasks: Vec::new(),
            categories: default_categories(),
            filter: TaskFilter::default(),
        }
    }

    #[must_use]
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces in-memory state with the persisted snapshot.
    ///
    /// Never fails: the adapter already falls back to an empty task list and
    /// the default categories.
    pub fn initialize(&mut self) {
        self.tasks = self.persistence.load_tasks();
        self.categories = normalize_categories(self.persistence.load_categories());
        info!(
            "event=store_init module=store status=ok tasks={} categories={}",
            self.tasks.len(),
            self.categories.len()
        );
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Creates a task from validated input and persists the collection.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` when the title is blank after trimming.
    pub fn add_task(&mut self, input: NewTask) -> StoreResult<Task> {
        let title = normalize_title(&input.title)?.to_string();
        let category = input
            .category
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_CATEGORY)
            .to_string();
        let now = self.now();

        let task = Task {
            id: self.fresh_id(),
            title,
            description: input
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            category,
            due_date: input.due_date,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        self.tasks.push(task.clone());
        debug!("event=task_add module=store status=ok task_id={}", task.id);
        self.persist_tasks("task_add");
        Ok(task)
    }

    /// Overwrites the provided fields of an existing task.
    ///
    /// # Errors
    /// - `TaskNotFound` when no task has `id`.
    /// - `Validation(EmptyTitle)` when a provided title is blank.
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> StoreResult<Task> {
        let index = self.position(id)?;
        let title = match update.title.as_deref() {
            Some(title) => Some(normalize_title(title)?.to_string()),
            None => None,
        };
        let now = self.now();

        let task = &mut self.tasks[index];
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = description.trim().to_string();
        }
        if let Some(category) = update.category {
            task.category = category;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        task.touch(now);
        let updated = task.clone();

        debug!("event=task_update module=store status=ok task_id={id}");
        self.persist_tasks("task_update");
        Ok(updated)
    }

    /// Removes one task.
    ///
    /// # Errors
    /// - `TaskNotFound` when no task has `id`.
    pub fn delete_task(&mut self, id: &str) -> StoreResult<()> {
        let index = self.position(id)?;
        self.tasks.remove(index);
        debug!("event=task_delete module=store status=ok task_id={id}");
        self.persist_tasks("task_delete");
        Ok(())
    }

    /// Flips the completion flag of one task.
    ///
    /// # Errors
    /// - `TaskNotFound` when no task has `id`.
    pub fn toggle_task_completion(&mut self, id: &str) -> StoreResult<Task> {
        let index = self.position(id)?;
        let now = self.now();

        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        task.touch(now);
        let toggled = task.clone();

        debug!(
            "event=task_toggle module=store status=ok task_id={id} completed={}",
            toggled.completed
        );
        self.persist_tasks("task_toggle");
        Ok(toggled)
    }

    /// Removes every completed task and returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(Task::is_pending);
        let removed = before - self.tasks.len();
        info!("event=tasks_clear_completed module=store status=ok removed={removed}");
        self.persist_tasks("tasks_clear_completed");
        removed
    }

    /// Drops every task and removes the persisted task entry.
    pub fn reset_tasks(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        if !self.persistence.clear_tasks() {
            warn!("event=tasks_reset module=store status=degraded reason=clear_failed");
        }
        info!("event=tasks_reset module=store status=ok removed={removed}");
        removed
    }

    /// Merges raw imported records into the collection.
    ///
    /// Each element must decode as a task, pass [`Task::validate`] and carry
    /// an id not already present; anything else is skipped.
    pub fn import_tasks(&mut self, records: Vec<Value>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for record in records {
            match self.decode_import(record) {
                Some(task) => {
                    self.tasks.push(task);
                    summary.imported += 1;
                }
                None => summary.skipped += 1,
            }
        }

        info!(
            "event=tasks_import module=store status=ok imported={} skipped={}",
            summary.imported, summary.skipped
        );
        if summary.imported > 0 {
            self.persist_tasks("tasks_import");
        }
        summary
    }

    /// Appends a user category.
    ///
    /// # Errors
    /// - `EmptyCategoryName` when blank after trimming.
    /// - `DuplicateCategory` on an exact, case-sensitive match.
    pub fn add_category(&mut self, name: &str) -> StoreResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(StoreError::EmptyCategoryName);
        }
        if self.categories.iter().any(|existing| existing == trimmed) {
            return Err(StoreError::DuplicateCategory(trimmed.to_string()));
        }

        self.categories.push(trimmed.to_string());
        self.persist_categories("category_add");
        Ok(())
    }

    /// Removes a user category. Tasks keep their (now dangling) category.
    ///
    /// # Errors
    /// - `CategoryNotFound` when `name` is not in the set.
    /// - `ProtectedCategory` when `name` is a default category.
    pub fn remove_category(&mut self, name: &str) -> StoreResult<()> {
        let index = self
            .categories
            .iter()
            .position(|existing| existing == name)
            .ok_or_else(|| StoreError::CategoryNotFound(name.to_string()))?;
        if is_default_category(name) {
            return Err(StoreError::ProtectedCategory(name.to_string()));
        }

        self.categories.remove(index);
        self.persist_categories("category_remove");
        Ok(())
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.filter.category = category;
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    pub fn set_search_text(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    /// Tasks matching the current filter selection, newest first.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        apply_filter(&self.tasks, &self.filter)
    }

    /// Tasks matching an explicit filter, newest first.
    pub fn filter_tasks(&self, filter: &TaskFilter) -> Vec<&Task> {
        apply_filter(&self.tasks, filter)
    }

    pub fn pending_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| !task.completed).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.completed).collect()
    }

    pub fn total_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn completion_rate(&self) -> u32 {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        completion_rate(completed, self.tasks.len())
    }

    pub fn stats(&self) -> TaskStats {
        calculate_stats(&self.tasks)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(3)
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))
    }

    fn contains_id(&self, id: &str) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    fn fresh_id(&mut self) -> TaskId {
        let mut candidate = self.ids.next_id();
        for _ in 1..MAX_ID_ATTEMPTS {
            if !candidate.is_empty() && !self.contains_id(&candidate) {
                return candidate;
            }
            warn!("event=task_id_collision module=store status=retry");
            candidate = self.ids.next_id();
        }
        if candidate.is_empty() || self.contains_id(&candidate) {
            candidate = format!("{candidate}-{}", UuidIdGenerator.next_id());
        }
        candidate
    }

    fn decode_import(&self, record: Value) -> Option<Task> {
        let mut task: Task = match serde_json::from_value(record) {
            Ok(task) => task,
            Err(err) => {
                debug!("event=task_import module=store status=skipped reason=decode error={err}");
                return None;
            }
        };
        if let Err(err) = task.validate() {
            debug!("event=task_import module=store status=skipped reason=invalid error={err}");
            return None;
        }
        if self.contains_id(&task.id) {
            debug!(
                "event=task_import module=store status=skipped reason=duplicate_id task_id={}",
                task.id
            );
            return None;
        }

        task.title = task.title.trim().to_string();
        task.description = task.description.trim().to_string();
        if task.category.trim().is_empty() {
            task.category = FALLBACK_CATEGORY.to_string();
        }
        Some(task)
    }

    fn persist_tasks(&mut self, op: &str) {
        if !self.persistence.save_tasks(&self.tasks) {
            warn!("event=store_persist module=store status=degraded op={op} target=tasks");
        }
    }

    fn persist_categories(&mut self, op: &str) {
        if !self.persistence.save_categories(&self.categories) {
            warn!("event=store_persist module=store status=degraded op={op} target=categories");
        }
    }
}
