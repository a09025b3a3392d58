use thiserror::Error;
use uuid::Uuid;

use crate::{
    classifier::{self, Partition},
    clock::Clock,
    models::{
        store::{StoreError, TaskStore},
        task::{Task, TaskPatch},
    },
    services::persist_tasks,
    storage::Storage,
};

#[derive(Debug, Error)]
pub enum AddTaskError {
    #[error("Daily limit reached ({0} tasks). Finish a task before adding another")]
    DailyLimitReached(u32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct AddTaskParameters {
    pub title: String,
    pub description: Option<String>,
}

/// Adds a task for today, refusing once today's list is at the daily limit
pub fn add_task<C: Clock>(
    store: &mut TaskStore<C>,
    storage: &impl Storage,
    parameters: AddTaskParameters,
) -> Result<Task, AddTaskError> {
    let limit = store.daily_limit();
    if at_daily_limit(store) {
        return Err(AddTaskError::DailyLimitReached(limit));
    }

    let task = store.add(&parameters.title, parameters.description.as_deref())?;
    persist_tasks(storage, store.tasks());

    Ok(task)
}

pub fn toggle_task<C: Clock>(
    store: &mut TaskStore<C>,
    storage: &impl Storage,
    id: Uuid,
) -> Result<Task, StoreError> {
    let task = store.toggle_complete(id)?;
    persist_tasks(storage, store.tasks());
    Ok(task)
}

pub fn delete_task<C: Clock>(
    store: &mut TaskStore<C>,
    storage: &impl Storage,
    id: Uuid,
) -> Result<Task, StoreError> {
    let task = store.delete(id)?;
    persist_tasks(storage, store.tasks());
    Ok(task)
}

pub struct EditTaskParameters {
    pub id: Uuid,
    pub title: Option<String>,
    /// `Some("")` clears the description
    pub description: Option<String>,
}

impl EditTaskParameters {
    pub fn has_changes(&self) -> bool {
        self.title.is_some() || self.description.is_some()
    }
}

/// Applies a title and/or description change. An edit with neither is rejected.
pub fn edit_task<C: Clock>(
    store: &mut TaskStore<C>,
    storage: &impl Storage,
    parameters: EditTaskParameters,
) -> Result<Task, StoreError> {
    if !parameters.has_changes() {
        return Err(StoreError::InvalidInput(String::from(
            "nothing to change, pass a title or a description",
        )));
    }

    let patch = TaskPatch {
        title: parameters.title,
        description: parameters.description.map(|d| {
            let d = d.trim();
            (!d.is_empty()).then(|| d.to_string())
        }),
        ..TaskPatch::default()
    };
    let task = store.update(parameters.id, patch)?;
    persist_tasks(storage, store.tasks());
    Ok(task)
}

#[derive(Debug, Error)]
pub enum MoveTaskError {
    #[error("Daily limit reached ({0} tasks). Finish a task before moving another to today")]
    DailyLimitReached(u32),

    #[error("Task '{0}' is not in the backlog")]
    NotInBacklog(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reschedules a backlog task to now
pub fn move_to_today<C: Clock>(
    store: &mut TaskStore<C>,
    storage: &impl Storage,
    id: Uuid,
) -> Result<Task, MoveTaskError> {
    let today = store.clock().today();
    let task = store.get_task(id).ok_or(StoreError::NotFound(id))?;
    if classifier::partition_of(task, &today) != Some(Partition::Backlog) {
        return Err(MoveTaskError::NotInBacklog(task.title.clone()));
    }
    if at_daily_limit(store) {
        return Err(MoveTaskError::DailyLimitReached(store.daily_limit()));
    }

    let now = store.clock().now();
    let task = store.update(id, TaskPatch::schedule(Some(now)))?;
    persist_tasks(storage, store.tasks());
    Ok(task)
}

fn at_daily_limit<C: Clock>(store: &TaskStore<C>) -> bool {
    store.today_tasks().len() >= store.daily_limit() as usize
}

#[derive(Debug, Error)]
pub enum ResolveTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Task reference is ambiguous. Multiple tasks found: {}", .0.join(", "))]
    AmbiguousTask(Vec<String>),
}

/// Finds a task by full id, id prefix, or a unique piece of its title
pub fn resolve_task(tasks: &[Task], id_or_fuzzy_title: &str) -> Result<Uuid, ResolveTaskError> {
    let needle = id_or_fuzzy_title.trim();
    let not_found = || ResolveTaskError::TaskNotFound(needle.to_string());

    if let Ok(id) = Uuid::parse_str(needle) {
        return tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.id)
            .ok_or_else(not_found);
    }

    let prefix = needle.replace('-', "").to_lowercase();
    if prefix.len() >= 4 && prefix.chars().all(|c| c.is_ascii_hexdigit()) {
        let by_prefix: Vec<_> = tasks
            .iter()
            .filter(|t| t.id.simple().to_string().starts_with(&prefix))
            .collect();
        if !by_prefix.is_empty() {
            return single(by_prefix);
        }
    }

    let lowered = needle.to_lowercase();
    let by_title: Vec<_> = tasks
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&lowered))
        .collect();

    match by_title.len() {
        0 => Err(not_found()),
        _ => single(by_title),
    }
}

fn single(matches: Vec<&Task>) -> Result<Uuid, ResolveTaskError> {
    match matches.as_slice() {
        [task] => Ok(task.id),
        _ => Err(ResolveTaskError::AmbiguousTask(
            matches
                .iter()
                .map(|t| format!("{} ({})", t.title, t.short_id()))
                .collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        storage::{hydrate::TASKS_KEY, memory::MemoryStorage},
    };
    use jiff::Timestamp;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn params(title: &str) -> AddTaskParameters {
        AddTaskParameters {
            title: title.to_string(),
            description: None,
        }
    }

    fn stored_titles(storage: &MemoryStorage) -> Vec<String> {
        let raw = storage.get(TASKS_KEY).unwrap().unwrap();
        let tasks: Vec<Task> = serde_json::from_str(&raw).unwrap();
        tasks.into_iter().map(|t| t.title).collect()
    }

    #[test]
    fn test_add_task_persists() {
        let clock = FixedClock::utc(ts("2024-01-15T09:00:00Z"));
        let storage = MemoryStorage::new();
        let mut store = TaskStore::new(&clock);

        let task = add_task(&mut store, &storage, params("Buy milk")).unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(stored_titles(&storage), vec!["Buy milk"]);
    }

    #[test]
    fn test_add_task_refused_at_daily_limit() {
        let clock = FixedClock::utc(ts("2024-01-15T09:00:00Z"));
        let storage = MemoryStorage::new();
        let mut store = TaskStore::new(&clock);
        for i in 0..4 {
            add_task(&mut store, &storage, params(&format!("Task {i}"))).unwrap();
        }

        let result = add_task(&mut store, &storage, params("Fifth"));

        assert!(matches!(result, Err(AddTaskError::DailyLimitReached(4))));
        assert_eq!(store.tasks().len(), 4);
        assert_eq!(store.stats().in_backlog, 0);

        // Completing one frees a slot
        let first = store.tasks()[0].id;
        toggle_task(&mut store, &storage, first).unwrap();
        add_task(&mut store, &storage, params("Fifth")).unwrap();
        assert_eq!(store.today_tasks().len(), 4);
    }

    #[test]
    fn test_add_task_passes_through_store_validation() {
        let clock = FixedClock::utc(ts("2024-01-15T09:00:00Z"));
        let storage = MemoryStorage::new();
        let mut store = TaskStore::new(&clock);

        let result = add_task(&mut store, &storage, params("   "));

        assert!(matches!(
            result,
            Err(AddTaskError::Store(StoreError::InvalidInput(_)))
        ));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_storage_failure_does_not_fail_command() {
        let clock = FixedClock::utc(ts("2024-01-15T09:00:00Z"));
        let storage = MemoryStorage::new();
        storage.set_offline(true);
        let mut store = TaskStore::new(&clock);

        let task = add_task(&mut store, &storage, params("Offline task")).unwrap();
        let toggled = toggle_task(&mut store, &storage, task.id).unwrap();

        assert!(toggled.completed);
        assert_eq!(store.stats().total_completed, 1);
    }

    #[test]
    fn test_delete_task_persists_and_reports_missing() {
        let clock = FixedClock::utc(ts("2024-01-15T09:00:00Z"));
        let storage = MemoryStorage::new();
        let mut store = TaskStore::new(&clock);
        let task = add_task(&mut store, &storage, params("Short lived")).unwrap();

        delete_task(&mut store, &storage, task.id).unwrap();
        assert!(stored_titles(&storage).is_empty());

        assert!(matches!(
            delete_task(&mut store, &storage, task.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_edit_task_title_and_description() {
        let clock = FixedClock::utc(ts("2024-01-15T09:00:00Z"));
        let storage = MemoryStorage::new();
        let mut store = TaskStore::new(&clock);
        let task = add_task(
            &mut store,
            &storage,
            AddTaskParameters {
                title: String::from("Draft"),
                description: Some(String::from("notes")),
            },
        )
        .unwrap();

        let edited = edit_task(
            &mut store,
            &storage,
            EditTaskParameters {
                id: task.id,
                title: Some(String::from("Final")),
                description: Some(String::from("  ")),
            },
        )
        .unwrap();

        assert_eq!(edited.title, "Final");
        assert_eq!(edited.description, None);
        assert_eq!(stored_titles(&storage), vec!["Final"]);
    }

    #[test]
    fn test_edit_task_without_changes_is_rejected() {
        let clock = FixedClock::utc(ts("2024-01-15T09:00:00Z"));
        let storage = MemoryStorage::new();
        let mut store = TaskStore::new(&clock);
        let task = store.add("Draft", None).unwrap();
        let before = store.snapshot();

        let params = EditTaskParameters {
            id: task.id,
            title: None,
            description: None,
        };
        assert!(!params.has_changes());
        let result = edit_task(&mut store, &storage, params);

        assert!(matches!(result, Err(StoreError::InvalidInput(_))));
        assert!(std::sync::Arc::ptr_eq(&before, &store.snapshot()));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_move_to_today_respects_limit_and_partition() {
        let clock = FixedClock::utc(ts("2024-01-14T09:00:00Z"));
        let storage = MemoryStorage::new();
        let mut store = TaskStore::new(&clock);
        let old = add_task(&mut store, &storage, params("Yesterday's task")).unwrap();

        clock.set(ts("2024-01-15T09:00:00Z"));
        store.set_daily_limit(1).unwrap();
        let current = add_task(&mut store, &storage, params("Today's task")).unwrap();

        assert!(matches!(
            move_to_today(&mut store, &storage, current.id),
            Err(MoveTaskError::NotInBacklog(_))
        ));
        assert!(matches!(
            move_to_today(&mut store, &storage, old.id),
            Err(MoveTaskError::DailyLimitReached(1))
        ));

        toggle_task(&mut store, &storage, current.id).unwrap();
        let moved = move_to_today(&mut store, &storage, old.id).unwrap();

        assert_eq!(moved.scheduled_date, Some(clock.now()));
        assert_eq!(store.today_tasks(), vec![&moved]);
        assert_eq!(store.stats().in_backlog, 0);
    }

    #[test]
    fn test_resolve_task_by_id_prefix_and_title() {
        let tasks = vec![
            Task {
                id: Uuid::parse_str("6f1c1f8e-2a55-4a5c-9a8e-2b0b8f0e5a11").unwrap(),
                title: String::from("Buy milk"),
                ..Task::default()
            },
            Task {
                id: Uuid::parse_str("6f2d0000-0000-4000-8000-000000000000").unwrap(),
                title: String::from("Buy bread"),
                ..Task::default()
            },
        ];

        assert_eq!(
            resolve_task(&tasks, "6f1c1f8e-2a55-4a5c-9a8e-2b0b8f0e5a11").unwrap(),
            tasks[0].id
        );
        assert_eq!(resolve_task(&tasks, "6f1c").unwrap(), tasks[0].id);
        assert_eq!(resolve_task(&tasks, "BREAD").unwrap(), tasks[1].id);
        assert!(matches!(
            resolve_task(&tasks, "6f"),
            Err(ResolveTaskError::TaskNotFound(_))
        ));
        assert!(matches!(
            resolve_task(&tasks, "buy"),
            Err(ResolveTaskError::AmbiguousTask(names)) if names.len() == 2
        ));
        assert!(matches!(
            resolve_task(&tasks, "00000000-0000-4000-8000-000000000001"),
            Err(ResolveTaskError::TaskNotFound(_))
        ));
    }
}
