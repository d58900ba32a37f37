#![allow(dead_code)]

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicI64, Ordering};
use taskdesk_core::{IdGenerator, Task, TaskPersistence, DEFAULT_CATEGORIES};

pub const START_MS: i64 = 1_767_225_600_000; // 2026-01-01T00:00:00Z

/// Clock that advances by a fixed step on every read.
pub struct StepClock {
    next_ms: AtomicI64,
    step_ms: i64,
}

impl StepClock {
    pub fn new(start_ms: i64, step_ms: i64) -> Self {
        Self {
            next_ms: AtomicI64::new(start_ms),
            step_ms,
        }
    }

    pub fn frozen(at_ms: i64) -> Self {
        Self::new(at_ms, 0)
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new(START_MS, 1_000)
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let ms = self.next_ms.fetch_add(self.step_ms, Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap()
    }
}

/// Ids `task-1`, `task-2`, ...
#[derive(Default)]
pub struct SequenceIds {
    next: u64,
}

impl IdGenerator for SequenceIds {
    fn next_id(&mut self) -> String {
        self.next += 1;
        format!("task-{}", self.next)
    }
}

/// Always yields the same id.
pub struct ConstantIds(pub &'static str);

impl IdGenerator for ConstantIds {
    fn next_id(&mut self) -> String {
        self.0.to_string()
    }
}

/// Fake persistence recording every snapshot it receives.
#[derive(Default)]
pub struct RecordingPersistence {
    pub stored_tasks: Option<Vec<Task>>,
    pub stored_categories: Option<Vec<String>>,
    pub task_saves: usize,
    pub category_saves: usize,
    pub clears: usize,
    pub fail_saves: bool,
}

impl RecordingPersistence {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            stored_tasks: Some(tasks),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }
}

impl TaskPersistence for RecordingPersistence {
    fn save_tasks(&mut self, tasks: &[Task]) -> bool {
        self.task_saves += 1;
        if self.fail_saves {
            return false;
        }
        self.stored_tasks = Some(tasks.to_vec());
        true
    }

    fn load_tasks(&self) -> Vec<Task> {
        self.stored_tasks.clone().unwrap_or_default()
    }

    fn clear_tasks(&mut self) -> bool {
        self.clears += 1;
        self.stored_tasks = None;
        true
    }

    fn save_categories(&mut self, categories: &[String]) -> bool {
        self.category_saves += 1;
        if self.fail_saves {
            return false;
        }
        self.stored_categories = Some(categories.to_vec());
        true
    }

    fn load_categories(&self) -> Vec<String> {
        self.stored_categories.clone().unwrap_or_else(|| {
            DEFAULT_CATEGORIES
                .iter()
                .map(|name| (*name).to_string())
                .collect()
        })
    }
}

pub fn timestamp(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

/// Builds a stored task directly, bypassing the store.
pub fn stored_task(id: &str, title: &str, category: &str, completed: bool, created_ms: i64) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        category: category.to_string(),
        due_date: None,
        completed,
        created_at: timestamp(created_ms),
        updated_at: timestamp(created_ms),
    }
}
