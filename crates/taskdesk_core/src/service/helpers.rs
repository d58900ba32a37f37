//! Shared task helpers: id generation, filtering, sorting and statistics.
//!
//! Everything here is a pure function of its inputs, except id generation.

use crate::model::filter::{CategoryFilter, StatusFilter, TaskFilter};
use crate::model::task::{Task, TaskId, TaskValidationError};
use uuid::Uuid;

/// Source of fresh task identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> TaskId;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> TaskId {
        Uuid::new_v4().to_string()
    }
}

/// Completion statistics over a task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded percentage in `0..=100`.
    pub completion_rate: u32,
}

/// Trims a task title, rejecting blank input.
pub fn normalize_title(title: &str) -> Result<&str, TaskValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed)
}

/// Sorts by `created_at`, newest first. Stable for equal timestamps.
pub fn sort_tasks_by_created_desc(tasks: &mut [&Task]) {
    tasks.sort_by(|left, right| right.created_at.cmp(&left.created_at));
}

pub fn filter_tasks_by_category<'a>(tasks: Vec<&'a Task>, filter: &CategoryFilter) -> Vec<&'a Task> {
    match filter {
        CategoryFilter::All => tasks,
        CategoryFilter::Named(_) => tasks
            .into_iter()
            .filter(|task| filter.matches(&task.category))
            .collect(),
    }
}

pub fn filter_tasks_by_status(tasks: Vec<&Task>, status: StatusFilter) -> Vec<&Task> {
    match status {
        StatusFilter::All => tasks,
        _ => tasks
            .into_iter()
            .filter(|task| status.matches(task.completed))
            .collect(),
    }
}

/// Keeps tasks whose title or description contains `query`, ignoring case.
///
/// A blank query keeps everything. The query itself is matched untrimmed.
pub fn search_tasks<'a>(tasks: Vec<&'a Task>, query: &str) -> Vec<&'a Task> {
    if query.trim().is_empty() {
        return tasks;
    }
    let needle = query.to_lowercase();
    tasks
        .into_iter()
        .filter(|task| {
            task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Applies category, status and search filters, then sorts newest first.
pub fn apply_filter<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let selected = filter_tasks_by_category(tasks.iter().collect(), &filter.category);
    let selected = filter_tasks_by_status(selected, filter.status);
    let mut selected = search_tasks(selected, &filter.search);
    sort_tasks_by_created_desc(&mut selected);
    selected
}

/// `round(100 * completed / total)`, or `0` for an empty collection.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (completed * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(100)
}

pub fn calculate_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskStats {
        total,
        completed,
        pending: total - completed,
        completion_rate: completion_rate(completed, total),
    }
}
