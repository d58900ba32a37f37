mod common;

use chrono::NaiveDate;
use common::{
    stored_task, ConstantIds, RecordingPersistence, SequenceIds, StepClock, START_MS,
};
use serde_json::json;
use std::collections::HashSet;
use taskdesk_core::{
    CategoryFilter, NewTask, StatusFilter, StoreError, TaskFilter, TaskStore, TaskUpdate,
    TaskValidationError, DEFAULT_CATEGORIES, FALLBACK_CATEGORY,
};

fn store() -> TaskStore<RecordingPersistence> {
    store_with(RecordingPersistence::default())
}

fn store_with(persistence: RecordingPersistence) -> TaskStore<RecordingPersistence> {
    let mut store = TaskStore::new(persistence)
        .with_id_generator(SequenceIds::default())
        .with_clock(StepClock::default());
    store.initialize();
    store
}

#[test]
fn initialize_loads_persisted_state() {
    let persisted = vec![
        stored_task("a", "first", "Trabalho", false, START_MS),
        stored_task("b", "second", "Casa", true, START_MS + 1),
    ];
    let mut persistence = RecordingPersistence::with_tasks(persisted.clone());
    let mut categories: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    categories.push("Casa".to_string());
    persistence.stored_categories = Some(categories.clone());

    let store = store_with(persistence);
    assert_eq!(store.tasks(), persisted.as_slice());
    assert_eq!(store.categories(), categories.as_slice());
    assert_eq!(store.persistence().task_saves, 0);
}

#[test]
fn initialize_with_empty_storage_uses_defaults() {
    let store = store();
    assert!(store.tasks().is_empty());
    assert_eq!(store.categories(), DEFAULT_CATEGORIES);
}

#[test]
fn add_task_trims_defaults_and_persists() {
    let mut store = store();

    let task = store
        .add_task(NewTask::new("  Buy milk  ").with_description("  two liters "))
        .unwrap();

    assert_eq!(task.id, "task-1");
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "two liters");
    assert_eq!(task.category, FALLBACK_CATEGORY);
    assert_eq!(task.due_date, None);
    assert!(!task.completed);
    assert_eq!(task.created_at, task.updated_at);

    let persistence = store.persistence();
    assert_eq!(persistence.task_saves, 1);
    assert_eq!(persistence.stored_tasks.as_deref(), Some(store.tasks()));
}

#[test]
fn add_task_keeps_explicit_category_and_due_date() {
    let mut store = store();
    let due = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();

    let task = store
        .add_task(
            NewTask::new("Report")
                .with_category("Trabalho")
                .with_due_date(due),
        )
        .unwrap();

    assert_eq!(task.category, "Trabalho");
    assert_eq!(task.due_date, Some(due));
}

#[test]
fn add_task_blank_category_falls_back() {
    let mut store = store();
    let task = store
        .add_task(NewTask::new("Walk").with_category("   "))
        .unwrap();
    assert_eq!(task.category, FALLBACK_CATEGORY);
}

#[test]
fn add_task_rejects_empty_and_blank_titles() {
    let mut store = store();

    for title in ["", "   "] {
        let err = store.add_task(NewTask::new(title)).unwrap_err();
        assert_eq!(err, StoreError::Validation(TaskValidationError::EmptyTitle));
    }

    assert!(store.tasks().is_empty());
    assert_eq!(store.persistence().task_saves, 0);
}

#[test]
fn add_task_assigns_unique_ids() {
    let mut store = store();
    for index in 0..20 {
        store.add_task(NewTask::new(format!("task {index}"))).unwrap();
    }

    let ids: HashSet<&str> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids.len(), 20);
}

#[test]
fn add_task_avoids_colliding_generated_ids() {
    let mut store = TaskStore::new(RecordingPersistence::default())
        .with_id_generator(ConstantIds("fixed"))
        .with_clock(StepClock::default());

    let first = store.add_task(NewTask::new("one")).unwrap();
    let second = store.add_task(NewTask::new("two")).unwrap();

    assert_eq!(first.id, "fixed");
    assert_ne!(second.id, first.id);
    assert!(second.id.starts_with("fixed-"));
}

#[test]
fn update_task_overwrites_fields_and_restamps() {
    let mut store = store();
    let task = store
        .add_task(NewTask::new("Draft").with_category("Estudos"))
        .unwrap();
    let due = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

    let updated = store
        .update_task(
            &task.id,
            TaskUpdate::new()
                .title("  Final  ")
                .description(" notes ")
                .category("Projetos")
                .due_date(Some(due))
                .completed(true),
        )
        .unwrap();

    assert_eq!(updated.id, task.id);
    assert_eq!(updated.created_at, task.created_at);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.description, "notes");
    assert_eq!(updated.category, "Projetos");
    assert_eq!(updated.due_date, Some(due));
    assert!(updated.completed);
    assert!(updated.updated_at > task.updated_at);
    assert_eq!(store.get_task(&task.id), Some(&updated));
    assert_eq!(store.persistence().task_saves, 2);
}

#[test]
fn update_task_can_clear_due_date_and_keeps_untouched_fields() {
    let mut store = store();
    let due = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let task = store
        .add_task(NewTask::new("Pay rent").with_due_date(due))
        .unwrap();

    let updated = store
        .update_task(&task.id, TaskUpdate::new().due_date(None))
        .unwrap();

    assert_eq!(updated.due_date, None);
    assert_eq!(updated.title, "Pay rent");
    assert_eq!(updated.category, task.category);
}

#[test]
fn update_task_rejects_blank_title_without_mutating() {
    let mut store = store();
    let task = store.add_task(NewTask::new("Keep me")).unwrap();

    let err = store
        .update_task(&task.id, TaskUpdate::new().title("  "))
        .unwrap_err();

    assert_eq!(err, StoreError::Validation(TaskValidationError::EmptyTitle));
    assert_eq!(store.get_task(&task.id), Some(&task));
    assert_eq!(store.persistence().task_saves, 1);
}

#[test]
fn operations_on_unknown_id_report_not_found_and_leave_state() {
    let mut store = store();
    store.add_task(NewTask::new("only")).unwrap();
    let before = store.tasks().to_vec();

    let missing = StoreError::TaskNotFound("nope".to_string());
    assert_eq!(
        store.update_task("nope", TaskUpdate::new().title("x")),
        Err(missing.clone())
    );
    assert_eq!(store.delete_task("nope"), Err(missing.clone()));
    assert_eq!(store.toggle_task_completion("nope"), Err(missing));

    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(store.persistence().task_saves, 1);
}

#[test]
fn delete_task_removes_and_persists() {
    let mut store = store();
    let keep = store.add_task(NewTask::new("keep")).unwrap();
    let drop = store.add_task(NewTask::new("drop")).unwrap();

    store.delete_task(&drop.id).unwrap();

    assert_eq!(store.tasks(), [keep].as_slice());
    assert_eq!(
        store.persistence().stored_tasks.as_deref(),
        Some(store.tasks())
    );
}

#[test]
fn toggle_twice_restores_flag_and_advances_updated_at() {
    let mut store = store();
    let task = store.add_task(NewTask::new("flip")).unwrap();

    let first = store.toggle_task_completion(&task.id).unwrap();
    assert!(first.completed);
    assert!(first.updated_at > task.updated_at);

    let second = store.toggle_task_completion(&task.id).unwrap();
    assert!(!second.completed);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.created_at, task.created_at);
}

#[test]
fn updated_at_never_precedes_created_at() {
    let mut store = TaskStore::new(RecordingPersistence::with_tasks(vec![stored_task(
        "future",
        "from the future",
        "Pessoal",
        false,
        START_MS + 60_000,
    )]))
    .with_clock(StepClock::frozen(START_MS));
    store.initialize();

    let toggled = store.toggle_task_completion("future").unwrap();
    assert!(toggled.updated_at >= toggled.created_at);
}

#[test]
fn clear_completed_removes_only_completed_and_is_idempotent() {
    let mut store = store();
    let a = store.add_task(NewTask::new("a")).unwrap();
    let b = store.add_task(NewTask::new("b")).unwrap();
    let c = store.add_task(NewTask::new("c")).unwrap();
    store.toggle_task_completion(&a.id).unwrap();
    store.toggle_task_completion(&c.id).unwrap();

    assert_eq!(store.clear_completed(), 2);
    let remaining: Vec<&str> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(remaining, vec![b.id.as_str()]);

    assert_eq!(store.clear_completed(), 0);
    assert_eq!(store.tasks().len(), 1);
}

#[test]
fn reset_tasks_clears_memory_and_storage_key() {
    let mut store = store();
    store.add_task(NewTask::new("a")).unwrap();
    store.add_task(NewTask::new("b")).unwrap();

    assert_eq!(store.reset_tasks(), 2);
    assert!(store.tasks().is_empty());
    assert_eq!(store.persistence().clears, 1);
    assert!(store.persistence().stored_tasks.is_none());
}

#[test]
fn add_category_appends_and_persists() {
    let mut store = store();

    store.add_category("  Casa ").unwrap();

    assert_eq!(store.categories().last().map(String::as_str), Some("Casa"));
    assert_eq!(store.persistence().category_saves, 1);
    assert_eq!(
        store.persistence().stored_categories.as_deref(),
        Some(store.categories())
    );
    assert_eq!(store.persistence().task_saves, 0);
}

#[test]
fn add_category_rejects_blank_and_exact_duplicates() {
    let mut store = store();
    store.add_category("Casa").unwrap();

    assert_eq!(store.add_category("   "), Err(StoreError::EmptyCategoryName));
    assert_eq!(
        store.add_category("Casa"),
        Err(StoreError::DuplicateCategory("Casa".to_string()))
    );
    assert_eq!(
        store.add_category("Trabalho"),
        Err(StoreError::DuplicateCategory("Trabalho".to_string()))
    );
    store.add_category("casa").unwrap();

    assert_eq!(store.categories().len(), DEFAULT_CATEGORIES.len() + 2);
    assert_eq!(store.persistence().category_saves, 2);
}

#[test]
fn remove_category_guards_defaults_and_unknown_names() {
    let mut store = store();

    for name in DEFAULT_CATEGORIES {
        assert_eq!(
            store.remove_category(name),
            Err(StoreError::ProtectedCategory(name.to_string()))
        );
    }
    assert_eq!(
        store.remove_category("Casa"),
        Err(StoreError::CategoryNotFound("Casa".to_string()))
    );
    assert_eq!(store.categories(), DEFAULT_CATEGORIES);
    assert_eq!(store.persistence().category_saves, 0);
}

#[test]
fn remove_category_keeps_dangling_task_references() {
    let mut store = store();
    store.add_category("Casa").unwrap();
    let task = store
        .add_task(NewTask::new("Fix sink").with_category("Casa"))
        .unwrap();

    store.remove_category("Casa").unwrap();

    assert!(!store.categories().iter().any(|name| name == "Casa"));
    assert_eq!(store.get_task(&task.id).unwrap().category, "Casa");
}

#[test]
fn save_failures_do_not_roll_back_mutations() {
    let mut store = store_with(RecordingPersistence::failing());

    let task = store.add_task(NewTask::new("still here")).unwrap();
    store.add_category("Casa").unwrap();

    assert_eq!(store.tasks(), [task].as_slice());
    assert!(store.categories().iter().any(|name| name == "Casa"));
    assert_eq!(store.persistence().task_saves, 1);
    assert_eq!(store.persistence().category_saves, 1);
}

fn seeded_store() -> TaskStore<RecordingPersistence> {
    let tasks = vec![
        stored_task("w-old", "Write spec", "Work", false, START_MS),
        stored_task("w-done", "Ship release", "Work", true, START_MS + 10),
        stored_task("w-new", "Review PR", "Work", false, START_MS + 20),
        stored_task("h-pending", "Water plants", "Home", false, START_MS + 30),
        stored_task("h-done", "Clean kitchen", "Home", true, START_MS + 40),
    ];
    store_with(RecordingPersistence::with_tasks(tasks))
}

fn ids<'a>(tasks: impl IntoIterator<Item = &'a taskdesk_core::Task>) -> Vec<&'a str> {
    tasks.into_iter().map(|task| task.id.as_str()).collect()
}

#[test]
fn filter_by_category_and_status_sorts_newest_first() {
    let store = seeded_store();
    let filter = TaskFilter::default()
        .with_category(CategoryFilter::named("Work"))
        .with_status(StatusFilter::Pending);

    assert_eq!(ids(store.filter_tasks(&filter)), vec!["w-new", "w-old"]);
}

#[test]
fn default_filter_returns_everything_newest_first() {
    let store = seeded_store();
    assert_eq!(
        ids(store.filtered_tasks()),
        vec!["h-done", "h-pending", "w-new", "w-done", "w-old"]
    );
}

#[test]
fn category_named_all_is_selected_by_name() {
    let mut store = store_with(RecordingPersistence::with_tasks(vec![
        stored_task("x", "in all", "all", false, START_MS),
        stored_task("y", "personal", "Pessoal", false, START_MS + 1),
    ]));
    store.add_category("all").unwrap();

    let filter = TaskFilter::default().with_category(CategoryFilter::parse("all"));
    assert_eq!(ids(store.filter_tasks(&filter)), vec!["x"]);

    let everything = TaskFilter::default().with_category(CategoryFilter::parse("Todas"));
    assert_eq!(store.filter_tasks(&everything).len(), 2);
}

#[test]
fn completed_status_filter_keeps_only_completed() {
    let mut store = seeded_store();
    store.set_status_filter(StatusFilter::Completed);
    assert_eq!(ids(store.filtered_tasks()), vec!["h-done", "w-done"]);
}

#[test]
fn search_is_case_insensitive_over_title_and_description() {
    let mut tasks = vec![
        stored_task("t1", "Buy MILK", "Home", false, START_MS),
        stored_task("t2", "Groceries", "Home", false, START_MS + 1),
        stored_task("t3", "Call mom", "Home", false, START_MS + 2),
    ];
    tasks[1].description = "eggs and milk".to_string();
    let mut store = store_with(RecordingPersistence::with_tasks(tasks));

    store.set_search_text("Milk");
    assert_eq!(ids(store.filtered_tasks()), vec!["t2", "t1"]);

    store.set_search_text("   ");
    assert_eq!(ids(store.filtered_tasks()), vec!["t3", "t2", "t1"]);
}

#[test]
fn blank_search_still_applies_category_and_status() {
    let mut store = seeded_store();
    store.set_filter(
        TaskFilter::default()
            .with_category(CategoryFilter::parse("Home"))
            .with_status("concluidas".parse().unwrap())
            .with_search(" "),
    );
    assert_eq!(ids(store.filtered_tasks()), vec!["h-done"]);
}

#[test]
fn equal_timestamps_keep_insertion_order() {
    let tasks = vec![
        stored_task("first", "a", "Home", false, START_MS),
        stored_task("second", "b", "Home", false, START_MS),
        stored_task("third", "c", "Home", false, START_MS),
    ];
    let store = store_with(RecordingPersistence::with_tasks(tasks));
    assert_eq!(ids(store.filtered_tasks()), vec!["first", "second", "third"]);
}

#[test]
fn partitions_and_completion_rate() {
    let mut store = store();
    assert_eq!(store.completion_rate(), 0);
    assert_eq!(store.stats().total, 0);

    let a = store.add_task(NewTask::new("a")).unwrap();
    store.add_task(NewTask::new("b")).unwrap();
    store.add_task(NewTask::new("c")).unwrap();
    store.toggle_task_completion(&a.id).unwrap();

    assert_eq!(store.total_tasks(), 3);
    assert_eq!(store.pending_tasks().len(), 2);
    assert_eq!(ids(store.completed_tasks()), vec![a.id.as_str()]);
    assert_eq!(store.completion_rate(), 33);

    let stats = store.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.completion_rate, 33);
}

#[test]
fn import_merges_valid_records_and_skips_the_rest() {
    let mut store = seeded_store();
    let records = vec![
        json!({
            "id": "imported-1",
            "title": "  Imported  ",
            "description": "",
            "category": "Work",
            "dueDate": "2026-05-01",
            "completed": false,
            "createdAt": "2026-01-02T00:00:00.000Z",
            "updatedAt": "2026-01-02T00:00:00.000Z"
        }),
        json!({
            "id": "w-old",
            "title": "duplicate id",
            "category": "Work",
            "createdAt": "2026-01-02T00:00:00.000Z",
            "updatedAt": "2026-01-02T00:00:00.000Z"
        }),
        json!({
            "id": "blank",
            "title": "   ",
            "category": "Work",
            "createdAt": "2026-01-02T00:00:00.000Z",
            "updatedAt": "2026-01-02T00:00:00.000Z"
        }),
        json!({
            "id": "backwards",
            "title": "time travel",
            "category": "Work",
            "createdAt": "2026-01-02T00:00:00.000Z",
            "updatedAt": "2026-01-01T00:00:00.000Z"
        }),
        json!("not a task"),
    ];

    let summary = store.import_tasks(records);

    assert_eq!(summary.imported, 1);
    assert_eq!(summary.skipped, 4);
    let imported = store.get_task("imported-1").unwrap();
    assert_eq!(imported.title, "Imported");
    assert_eq!(imported.due_date, NaiveDate::from_ymd_opt(2026, 5, 1));
    assert_eq!(store.total_tasks(), 6);
    assert_eq!(store.persistence().task_saves, 1);
}

#[test]
fn import_without_category_uses_fallback() {
    let mut store = store();
    let summary = store.import_tasks(vec![
        json!({
            "id": "no-category",
            "title": "Loose",
            "createdAt": "2026-01-02T00:00:00.000Z",
            "updatedAt": "2026-01-02T00:00:00.000Z"
        }),
        json!({
            "id": "blank-category",
            "title": "Blank",
            "category": "  ",
            "createdAt": "2026-01-02T00:00:00.000Z",
            "updatedAt": "2026-01-02T00:00:00.000Z"
        }),
    ]);

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(store.get_task("no-category").unwrap().category, FALLBACK_CATEGORY);
    assert_eq!(store.get_task("blank-category").unwrap().category, FALLBACK_CATEGORY);
}

#[test]
fn import_with_nothing_valid_does_not_persist() {
    let mut store = store();
    let summary = store.import_tasks(vec![json!({ "title": "no id" })]);
    assert_eq!(summary.imported, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(store.persistence().task_saves, 0);
}
