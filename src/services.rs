//! Operations as the user interface sees them: store command, the policy
//! checks the store leaves to its callers, then a write-through to storage.

use crate::{
    models::task::Task,
    storage::{
        Storage,
        hydrate::{save_daily_limit, save_tasks},
    },
};

pub mod archive;
pub mod settings;
pub mod tasks;

/// Storage failures after a command are not fatal, the in-memory state stays authoritative
fn persist_tasks(storage: &impl Storage, tasks: &[Task]) {
    if let Err(e) = save_tasks(storage, tasks) {
        tracing::warn!(error = %e, "Could not persist tasks, continuing in memory");
    }
}

fn persist_daily_limit(storage: &impl Storage, limit: u32) {
    if let Err(e) = save_daily_limit(storage, limit) {
        tracing::warn!(error = %e, "Could not persist daily limit, continuing in memory");
    }
}
