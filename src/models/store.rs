use std::{collections::HashSet, sync::Arc};

use jiff::Timestamp;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    classifier,
    clock::{Clock, Day, SystemClock},
    models::{
        stats::TaskStats,
        task::{Task, TaskPatch},
    },
    storage::StorageError,
};

/// Daily limit of a fresh collection
pub const DEFAULT_DAILY_LIMIT: u32 = 4;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task '{0}' not found")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] StorageError),
}

/// One immutable snapshot of the collection
#[derive(Debug, Clone, PartialEq)]
pub struct TaskState {
    /// Tasks in insertion order
    pub tasks: Vec<Task>,
    /// Soft cap on today's tasks, enforced by callers
    pub daily_limit: u32,
    /// Derived from `tasks` and `daily_limit` when the snapshot was made
    pub stats: TaskStats,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            tasks: vec![],
            daily_limit: DEFAULT_DAILY_LIMIT,
            stats: TaskStats {
                daily_limit: DEFAULT_DAILY_LIMIT,
                ..TaskStats::default()
            },
        }
    }
}

impl TaskState {
    pub fn get_task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Add {
        id: Uuid,
        title: String,
        description: Option<String>,
    },
    ToggleComplete {
        id: Uuid,
    },
    Delete {
        id: Uuid,
    },
    Update {
        id: Uuid,
        patch: TaskPatch,
    },
    SetDailyLimit {
        limit: u32,
    },
    Load {
        tasks: Vec<Task>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::ToggleComplete { .. } => "toggle_complete",
            Command::Delete { .. } => "delete",
            Command::Update { .. } => "update",
            Command::SetDailyLimit { .. } => "set_daily_limit",
            Command::Load { .. } => "load",
        }
    }
}

/// Applies a command to a snapshot, producing the next snapshot.
///
/// `now` stamps creation and completion times, `today` is used for the
/// statistics. The input snapshot is never touched; on error the caller
/// keeps the old one.
pub fn reduce(
    state: &TaskState,
    command: Command,
    now: Timestamp,
    today: &Day,
) -> Result<TaskState, StoreError> {
    let mut tasks = state.tasks.clone();
    let mut daily_limit = state.daily_limit;

    match command {
        Command::Add {
            id,
            title,
            description,
        } => {
            let title = normalize_title(&title)?;
            if tasks.iter().any(|t| t.id == id) {
                return Err(StoreError::InvalidInput(format!(
                    "task id '{id}' is already in use"
                )));
            }
            let description = description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());
            tasks.push(Task::new(id, title, description, now));
        }
        Command::ToggleComplete { id } => {
            let task = find_mut(&mut tasks, id)?;
            let completed = !task.completed;
            task.set_completed(completed, now);
        }
        Command::Delete { id } => {
            let position = tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or(StoreError::NotFound(id))?;
            tasks.remove(position);
        }
        Command::Update { id, patch } => {
            let task = find_mut(&mut tasks, id)?;
            apply_patch(task, patch, now)?;
        }
        Command::SetDailyLimit { limit } => {
            daily_limit = limit;
        }
        Command::Load { tasks: loaded } => {
            validate_loaded(&loaded)?;
            tasks = loaded;
        }
    }

    let stats = TaskStats::compute(&tasks, daily_limit, today);
    Ok(TaskState {
        tasks,
        daily_limit,
        stats,
    })
}

fn normalize_title(title: &str) -> Result<String, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::InvalidInput(String::from(
            "task title must not be empty",
        )));
    }
    Ok(title.to_string())
}

fn find_mut(tasks: &mut [Task], id: Uuid) -> Result<&mut Task, StoreError> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(StoreError::NotFound(id))
}

fn apply_patch(task: &mut Task, patch: TaskPatch, now: Timestamp) -> Result<(), StoreError> {
    if let Some(title) = patch.title {
        task.title = normalize_title(&title)?;
    }
    if let Some(description) = patch.description {
        task.description = description;
    }
    if let Some(scheduled_date) = patch.scheduled_date {
        task.scheduled_date = scheduled_date;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(completed) = patch.completed {
        task.set_completed(completed, now);
    }
    Ok(())
}

fn validate_loaded(tasks: &[Task]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.id) {
            return Err(StoreError::InvalidInput(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
        if !task.is_consistent() {
            return Err(StoreError::InvalidInput(format!(
                "task '{}' has completed={} but completedAt is {}",
                task.id,
                task.completed,
                if task.completed_at.is_some() {
                    "set"
                } else {
                    "missing"
                }
            )));
        }
    }
    Ok(())
}

/// The single writer of the task collection.
///
/// Every successful command swaps in a new [`TaskState`]; readers holding an
/// earlier snapshot from [`TaskStore::snapshot`] keep seeing it unchanged.
pub struct TaskStore<C = SystemClock> {
    state: Arc<TaskState>,
    clock: C,
}

impl Default for TaskStore<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> TaskStore<C> {
    pub fn new(clock: C) -> Self {
        Self {
            state: Arc::new(TaskState::default()),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn snapshot(&self) -> Arc<TaskState> {
        Arc::clone(&self.state)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn daily_limit(&self) -> u32 {
        self.state.daily_limit
    }

    pub fn stats(&self) -> TaskStats {
        self.state.stats
    }

    pub fn get_task(&self, id: Uuid) -> Option<&Task> {
        self.state.get_task(id)
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Arc<TaskState>, StoreError> {
        let name = command.name();
        let next = reduce(&self.state, command, self.clock.now(), &self.clock.today())
            .inspect_err(|e| tracing::debug!(command = name, error = %e, "Command rejected"))?;
        tracing::debug!(
            command = name,
            tasks = next.tasks.len(),
            daily_limit = next.daily_limit,
            "Command applied"
        );
        self.state = Arc::new(next);
        Ok(self.snapshot())
    }

    pub fn add(&mut self, title: &str, description: Option<&str>) -> Result<Task, StoreError> {
        let mut id = Uuid::new_v4();
        while self.get_task(id).is_some() {
            id = Uuid::new_v4();
        }
        let state = self.dispatch(Command::Add {
            id,
            title: title.to_string(),
            description: description.map(String::from),
        })?;
        Self::task_in(&state, id)
    }

    pub fn toggle_complete(&mut self, id: Uuid) -> Result<Task, StoreError> {
        let state = self.dispatch(Command::ToggleComplete { id })?;
        Self::task_in(&state, id)
    }

    /// Removes the task for good and hands it back
    pub fn delete(&mut self, id: Uuid) -> Result<Task, StoreError> {
        let removed = self.get_task(id).cloned().ok_or(StoreError::NotFound(id))?;
        self.dispatch(Command::Delete { id })?;
        Ok(removed)
    }

    pub fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        let state = self.dispatch(Command::Update { id, patch })?;
        Self::task_in(&state, id)
    }

    pub fn set_daily_limit(&mut self, limit: u32) -> Result<TaskStats, StoreError> {
        let state = self.dispatch(Command::SetDailyLimit { limit })?;
        Ok(state.stats)
    }

    pub fn load(&mut self, tasks: Vec<Task>) -> Result<(), StoreError> {
        self.dispatch(Command::Load { tasks })?;
        Ok(())
    }

    /// Drops every task and restores the default limit
    pub fn reset(&mut self) {
        self.state = Arc::new(TaskState::default());
    }

    pub fn today_tasks(&self) -> Vec<&Task> {
        classifier::today(self.tasks(), &self.clock.today())
    }

    pub fn backlog_tasks(&self) -> Vec<&Task> {
        classifier::backlog(self.tasks(), &self.clock.today())
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        classifier::completed(self.tasks())
    }

    fn task_in(state: &TaskState, id: Uuid) -> Result<Task, StoreError> {
        state.get_task(id).cloned().ok_or(StoreError::NotFound(id))
    }
}
