use colored::*;
use jiff::Timestamp;
use totitodo::{
    clock::Day,
    models::{stats::TaskStats, task::Task},
    services::archive::ArchiveSummary,
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(task: &Task, is_overdue: bool) -> ColoredString {
    if task.completed {
        "✓".dimmed()
    } else if is_overdue {
        "●".red()
    } else {
        "○".normal()
    }
}

/// Render a single task line with short id, glyph, title and its description below
pub fn render_task_line(task: &Task, is_overdue: bool, today: &Day) {
    let right = if is_overdue {
        task.scheduled_date.map(|date| format_day(date, "Planned ", today))
    } else {
        None
    };
    render_task_line_with_right(task, is_overdue, right);
}

/// Render a task line with its completion date right-aligned
pub fn render_task_line_with_completion_date(task: &Task, today: &Day) {
    let right = task.completed_at.map(|at| format_day(at, "", today));
    render_task_line_with_right(task, false, right);
}

fn render_task_line_with_right(task: &Task, is_overdue: bool, right_section: Option<String>) {
    let terminal_width = get_terminal_width();

    let id_str = task.short_id();
    let glyph = get_status_glyph(task, is_overdue);
    let title = &task.title;

    let left_section = format!("  {}  {}  {}", id_str, glyph, title);

    let styled_left = if task.completed {
        left_section.dimmed()
    } else {
        left_section.bold()
    };

    match right_section {
        Some(right) => {
            let left_visible_len = format!("  {}  {}  {}", id_str, " ", title).chars().count();
            let right_visible_len = right.chars().count();
            let total_content = left_visible_len + right_visible_len;

            if total_content + 4 < terminal_width {
                let padding = terminal_width - total_content - 2;
                println!("{}{}{}", styled_left, " ".repeat(padding), right.dimmed());
            } else {
                // Not enough space for right alignment, just print normally
                println!("{}", styled_left);
            }
        }
        None => println!("{}", styled_left),
    }

    if let Some(description) = &task.description {
        println!("              {}", description.dimmed());
    }
}

/// Format a timestamp's day for display (e.g., "Feb 15", "Today", "Yesterday")
fn format_day(timestamp: Timestamp, prefix: &str, today: &Day) -> String {
    let date = today.date_of(timestamp);
    let today = today.date();

    if date == today {
        format!("{}today", prefix)
    } else if today.yesterday().is_ok_and(|yesterday| yesterday == date) {
        format!("{}yesterday", prefix)
    } else {
        format!("{}{}", prefix, date.strftime("%b %d"))
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, task_word);
}

/// "2 / 4 done today" plus a warning once today's list is full
pub fn render_daily_progress(stats: &TaskStats, planned_today: usize) {
    let progress = format!(
        "{} / {} done today",
        stats.completed_today, stats.daily_limit
    );
    println!("  {}", progress.dimmed());

    if planned_today >= stats.daily_limit as usize && planned_today > 0 {
        println!(
            "  {}",
            format!(
                "Daily limit reached ({} tasks). Finish current tasks to add new ones.",
                stats.daily_limit
            )
            .yellow()
        );
    }
}

pub fn render_stats(stats: &TaskStats, planned_today: usize) {
    println!("\n  {}\n", "STATS".cyan().bold());
    println!("  {:<18}{} / {}", "Today", planned_today, stats.daily_limit);
    println!("  {:<18}{}", "Completed today", stats.completed_today);
    println!("  {:<18}{}", "Completed total", stats.total_completed);
    println!("  {:<18}{}", "In backlog", stats.in_backlog);
    println!();
}

pub fn render_archive_summary(summary: &ArchiveSummary) {
    println!(
        "  {} {}   {} {}   {} {}",
        summary.total.to_string().green().bold(),
        "total".dimmed(),
        summary.this_week.to_string().cyan().bold(),
        "this week".dimmed(),
        summary.this_month.to_string().magenta().bold(),
        "this month".dimmed()
    );
}
