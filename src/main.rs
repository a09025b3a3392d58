use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use totitodo::{
    clock::Clock,
    config,
    models::store::{StoreError, TaskStore},
    services::{
        archive::{search_archive, summarize},
        settings::{SettingsError, clear_all_data, export_data, set_daily_limit, write_export},
        tasks::{
            AddTaskError, AddTaskParameters, EditTaskParameters, MoveTaskError, ResolveTaskError,
            add_task, delete_task, edit_task, move_to_today, resolve_task, toggle_task,
        },
    },
    storage::{hydrate::hydrate, json::JsonFileStorage},
};

mod ui;

#[derive(Parser)]
#[command(
    name = "totitodo",
    about = "A daily-focus task manager: a few tasks a day, the rest in the backlog"
)]
struct Cli {
    /// Path of the store file
    #[arg(long, global = true, env = config::STORE_PATH_ENV)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's tasks
    Today,

    /// Show unscheduled and overdue tasks
    Backlog,

    /// Show completed tasks, optionally filtered
    Archive {
        /// Text to look for in titles and descriptions
        query: Option<String>,
    },

    /// Add a task for today
    Add {
        /// Task title
        title: String,

        /// Add a description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Complete a task, or reopen a completed one
    #[command(alias = "done")]
    Toggle {
        /// Task id prefix or part of its title
        task: String,
    },

    /// Change a task's title or description
    Edit {
        /// Task id prefix or part of its title
        task: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description (empty to remove it)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a task permanently
    Delete {
        /// Task id prefix or part of its title
        task: String,
    },

    /// Move a backlog task to today
    Move {
        /// Task id prefix or part of its title
        task: String,
    },

    /// Show or set the daily limit (1-20)
    Limit { value: Option<u32> },

    /// Show statistics
    Stats,

    /// Export all data as JSON
    Export {
        /// File or directory to write to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Delete all tasks and settings
    Clear {
        /// Confirm that all data should be deleted
        #[arg(long)]
        yes: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(config::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    // Initialize storage
    let storage_path = config::resolve_store_path(cli.store);

    // Create parent directory if it doesn't exist
    if let Some(parent) = storage_path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        tracing::warn!(
            path = %parent.display(),
            error = %e,
            "Failed to create data directory, changes will not be saved"
        );
    }

    let storage = JsonFileStorage::new(storage_path);

    let mut store: TaskStore = TaskStore::default();
    if let Err(e) = hydrate(&mut store, &storage) {
        tracing::warn!(error = %e, "Starting with an empty in-memory task list");
    }

    match cli.command.unwrap_or(Commands::Today) {
        Commands::Today => {
            let today_tasks = store.today_tasks();
            let today = store.clock().today();

            if today_tasks.is_empty() {
                println!("No tasks for today");
            } else {
                ui::render_view_header(
                    &format!("Today ({})", today.date().strftime("%b %d")),
                    today_tasks.len(),
                );
                for task in &today_tasks {
                    ui::render_task_line(task, false, &today);
                }
                println!();
            }
            ui::render_daily_progress(&store.stats(), today_tasks.len());
        }
        Commands::Backlog => {
            let backlog_tasks = store.backlog_tasks();
            let today = store.clock().today();

            if backlog_tasks.is_empty() {
                println!("Backlog is empty");
            } else {
                ui::render_view_header("Backlog", backlog_tasks.len());
                for task in backlog_tasks {
                    ui::render_task_line(task, task.scheduled_date.is_some(), &today);
                }
                if store.today_tasks().len() >= store.daily_limit() as usize {
                    println!(
                        "\n  {}",
                        format!(
                            "Daily limit reached ({}). Finish current tasks to move more to today.",
                            store.daily_limit()
                        )
                        .yellow()
                    );
                }
            }
        }
        Commands::Archive { query } => {
            let summary = summarize(store.tasks(), store.clock());
            let query = query.unwrap_or_default();
            let matches = search_archive(store.tasks(), &query);
            let today = store.clock().today();

            if summary.total == 0 {
                println!("Archive is empty. Complete some tasks to see them here");
            } else if matches.is_empty() {
                println!("Nothing found for \"{}\"", query);
            } else {
                ui::render_view_header("Archive", matches.len());
                ui::render_archive_summary(&summary);
                println!();
                for task in matches {
                    ui::render_task_line_with_completion_date(task, &today);
                }
                if summary.total >= 10 {
                    println!(
                        "\n  {}",
                        format!("Congratulations! You have completed {} tasks!", summary.total)
                            .green()
                    );
                }
            }
        }
        Commands::Add { title, description } => {
            let params = AddTaskParameters { title, description };

            match add_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task added: {}", task.title);
                    println!("  {}", task.short_id().dimmed());
                }
                Err(AddTaskError::DailyLimitReached(limit)) => {
                    eprintln!("Error: Daily limit reached ({} tasks)", limit);
                    eprintln!(
                        "\nFinish a task first, or raise the limit with `totitodo limit <N>`."
                    );
                    std::process::exit(1);
                }
                Err(AddTaskError::Store(e)) => exit_with_store_error(e),
            }
        }
        Commands::Toggle { task } => {
            let id = resolve_or_exit(&store, &task);
            match toggle_task(&mut store, &storage, id) {
                Ok(task) if task.completed => println!("✓ Task completed: {}", task.title),
                Ok(task) => println!("○ Task reopened: {}", task.title),
                Err(e) => exit_with_store_error(e),
            }
        }
        Commands::Edit {
            task,
            title,
            description,
        } => {
            if title.is_none() && description.is_none() {
                eprintln!("Error: Nothing to change");
                eprintln!("\nPass --title and/or --description.");
                std::process::exit(1);
            }
            let id = resolve_or_exit(&store, &task);
            let params = EditTaskParameters {
                id,
                title,
                description,
            };
            match edit_task(&mut store, &storage, params) {
                Ok(task) => println!("✓ Task updated: {}", task.title),
                Err(e) => exit_with_store_error(e),
            }
        }
        Commands::Delete { task } => {
            let id = resolve_or_exit(&store, &task);
            match delete_task(&mut store, &storage, id) {
                Ok(task) => println!("✓ Task deleted: {}", task.title),
                Err(e) => exit_with_store_error(e),
            }
        }
        Commands::Move { task } => {
            let id = resolve_or_exit(&store, &task);
            match move_to_today(&mut store, &storage, id) {
                Ok(task) => println!("✓ Moved to today: {}", task.title),
                Err(MoveTaskError::DailyLimitReached(limit)) => {
                    eprintln!("Error: Daily limit reached ({} tasks)", limit);
                    eprintln!("\nFinish current tasks to move more to today.");
                    std::process::exit(1);
                }
                Err(MoveTaskError::NotInBacklog(title)) => {
                    eprintln!("Error: Task '{}' is not in the backlog", title);
                    std::process::exit(1);
                }
                Err(MoveTaskError::Store(e)) => exit_with_store_error(e),
            }
        }
        Commands::Limit { value: None } => {
            println!("Daily limit: {} tasks", store.daily_limit());
        }
        Commands::Limit { value: Some(limit) } => {
            match set_daily_limit(&mut store, &storage, limit) {
                Ok(stats) => println!("✓ Daily limit set to {} tasks", stats.daily_limit),
                Err(SettingsError::LimitOutOfRange(value)) => {
                    eprintln!("Error: Daily limit must be between 1 and 20, got {}", value);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Stats => {
            ui::render_stats(&store.stats(), store.today_tasks().len());
        }
        Commands::Export { output } => {
            let document = export_data(&store);
            match write_export(&document, &output) {
                Ok(path) => println!("✓ Exported {} tasks to {}", document.tasks.len(), path.display()),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Clear { yes: false } => {
            eprintln!("This deletes all tasks and settings and cannot be undone.");
            eprintln!("\nRun `totitodo clear --yes` to confirm.");
            std::process::exit(1);
        }
        Commands::Clear { yes: true } => match clear_all_data(&mut store, &storage) {
            Ok(()) => println!("✓ All data cleared"),
            Err(e) => {
                eprintln!("Error: Failed to clear data: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn resolve_or_exit(store: &TaskStore, needle: &str) -> Uuid {
    match resolve_task(store.tasks(), needle) {
        Ok(id) => id,
        Err(ResolveTaskError::TaskNotFound(needle)) => {
            eprintln!("Error: Task '{}' not found", needle);
            std::process::exit(1);
        }
        Err(ResolveTaskError::AmbiguousTask(names)) => {
            eprintln!("Error: Task reference is ambiguous. Multiple tasks found:");
            for name in names {
                eprintln!("  - {}", name);
            }
            eprintln!("\nPlease be more specific or use the task id.");
            std::process::exit(1);
        }
    }
}

fn exit_with_store_error(error: StoreError) -> ! {
    match error {
        StoreError::NotFound(id) => eprintln!("Error: Task '{}' not found", id),
        StoreError::InvalidInput(reason) => eprintln!("Error: {}", reason),
        StoreError::PersistenceUnavailable(e) => eprintln!("Error: Storage unavailable: {}", e),
    }
    std::process::exit(1);
}
