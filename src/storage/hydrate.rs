//! Moving the task collection in and out of a [`Storage`].
//!
//! Two keys are used: the task list as a JSON array and the daily limit as
//! a decimal string.

use crate::{
    clock::Clock,
    models::{
        store::{StoreError, TaskStore},
        task::Task,
    },
    storage::{Storage, StorageError},
};

pub const TASKS_KEY: &str = "totitodo-tasks";
pub const DAILY_LIMIT_KEY: &str = "totitodo-daily-limit";

/// Fills the store from storage.
///
/// Missing or malformed data is logged and skipped, leaving the defaults in
/// place. Only a storage that cannot be read at all is an error.
pub fn hydrate<C: Clock>(
    store: &mut TaskStore<C>,
    storage: &impl Storage,
) -> Result<(), StoreError> {
    if let Some(raw) = storage.get(TASKS_KEY)? {
        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                let count = tasks.len();
                match store.load(tasks) {
                    Ok(()) => tracing::debug!(tasks = count, "Loaded tasks"),
                    Err(e) => tracing::warn!(error = %e, "Ignoring stored tasks"),
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to parse stored tasks, starting empty"),
        }
    }

    if let Some(raw) = storage.get(DAILY_LIMIT_KEY)? {
        match raw.trim().parse::<u32>() {
            Ok(limit) => {
                if let Err(e) = store.set_daily_limit(limit) {
                    tracing::warn!(value = limit, error = %e, "Ignoring stored daily limit");
                }
            }
            Err(e) => tracing::warn!(value = %raw, error = %e, "Ignoring stored daily limit"),
        }
    }

    Ok(())
}

pub fn save_tasks(storage: &impl Storage, tasks: &[Task]) -> Result<(), StorageError> {
    let json =
        serde_json::to_string(tasks).map_err(|e| StorageError::SerializeFailed { source: e })?;
    storage.set(TASKS_KEY, &json)
}

pub fn save_daily_limit(storage: &impl Storage, limit: u32) -> Result<(), StorageError> {
    storage.set(DAILY_LIMIT_KEY, &limit.to_string())
}
