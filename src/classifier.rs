//! Splits a task list into the today, backlog and archive views.
//!
//! Everything here is a pure function of the tasks and the current [`Day`].
//! A task scheduled for a later day is in none of the views until its day
//! arrives.

use crate::{clock::Day, models::task::Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Today,
    Backlog,
    Completed,
}

/// Which view a task shows up in, if any
pub fn partition_of(task: &Task, today: &Day) -> Option<Partition> {
    if task.completed {
        return Some(Partition::Completed);
    }
    match task.scheduled_date {
        None => Some(Partition::Backlog),
        Some(date) if today.is_after(date) => Some(Partition::Backlog),
        Some(date) if today.contains(date) => Some(Partition::Today),
        Some(_) => None,
    }
}

/// Incomplete tasks scheduled on the current day, in input order
pub fn today<'a>(tasks: &'a [Task], today: &Day) -> Vec<&'a Task> {
    filter(tasks, today, Partition::Today)
}

/// Incomplete tasks with no date or a date before the current day, in input order
pub fn backlog<'a>(tasks: &'a [Task], today: &Day) -> Vec<&'a Task> {
    filter(tasks, today, Partition::Backlog)
}

/// Every completed task, whatever its schedule
pub fn completed(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.completed).collect()
}

fn filter<'a>(tasks: &'a [Task], today: &Day, partition: Partition) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| partition_of(t, today) == Some(partition))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{Timestamp, tz::TimeZone};
    use uuid::Uuid;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn task(title: &str, scheduled: Option<&str>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            created_at: ts("2024-01-01T00:00:00Z"),
            scheduled_date: scheduled.map(ts),
            ..Task::default()
        }
    }

    fn titles(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|t| t.title.as_str()).collect()
    }

    fn day(s: &str) -> Day {
        Day::of(ts(s), TimeZone::UTC)
    }

    #[test]
    fn test_today_keeps_input_order() {
        let tasks = vec![
            task("b", Some("2024-01-15T18:00:00Z")),
            task("yesterday", Some("2024-01-14T18:00:00Z")),
            task("a", Some("2024-01-15T06:00:00Z")),
        ];

        let result = today(&tasks, &day("2024-01-15T12:00:00Z"));

        assert_eq!(titles(result), vec!["b", "a"]);
    }

    #[test]
    fn test_backlog_holds_unscheduled_and_overdue() {
        let tasks = vec![
            task("unscheduled", None),
            task("overdue", Some("2024-01-10T09:00:00Z")),
            task("today", Some("2024-01-15T09:00:00Z")),
        ];

        let result = backlog(&tasks, &day("2024-01-15T12:00:00Z"));

        assert_eq!(titles(result), vec!["unscheduled", "overdue"]);
    }

    #[test]
    fn test_completed_ignores_schedule() {
        let mut done_future = task("done future", Some("2024-02-01T09:00:00Z"));
        done_future.set_completed(true, ts("2024-01-15T10:00:00Z"));
        let mut done_unscheduled = task("done unscheduled", None);
        done_unscheduled.set_completed(true, ts("2024-01-15T11:00:00Z"));
        let open = task("open", Some("2024-01-15T09:00:00Z"));
        let tasks = vec![done_future, open, done_unscheduled];

        assert_eq!(
            titles(completed(&tasks)),
            vec!["done future", "done unscheduled"]
        );
        assert!(today(&tasks, &day("2024-01-15T12:00:00Z"))
            .iter()
            .all(|t| !t.completed));
    }

    #[test]
    fn test_future_task_is_in_no_view() {
        let tasks = vec![
            task("tomorrow", Some("2024-01-16T00:00:00Z")),
            task("next week", Some("2024-01-22T09:00:00Z")),
        ];
        let now = day("2024-01-15T23:59:59Z");

        assert!(today(&tasks, &now).is_empty());
        assert!(backlog(&tasks, &now).is_empty());
        assert!(completed(&tasks).is_empty());
        assert_eq!(partition_of(&tasks[0], &now), None);

        // Once its day comes it is a today task, the day after it is backlog
        assert_eq!(
            partition_of(&tasks[0], &day("2024-01-16T00:00:00Z")),
            Some(Partition::Today)
        );
        assert_eq!(
            partition_of(&tasks[0], &day("2024-01-17T00:00:00Z")),
            Some(Partition::Backlog)
        );
    }

    #[test]
    fn test_midnight_belongs_to_the_day_it_starts() {
        let midnight = task("midnight", Some("2024-01-15T00:00:00Z"));

        assert_eq!(
            partition_of(&midnight, &day("2024-01-15T08:00:00Z")),
            Some(Partition::Today)
        );
        assert_eq!(
            partition_of(&midnight, &day("2024-01-14T23:00:00Z")),
            None
        );
    }

    #[test]
    fn test_day_truncation_follows_time_zone() {
        // 23:30 UTC on the 14th is 02:30 on the 15th at UTC+3
        let late = task("late", Some("2024-01-14T23:30:00Z"));
        let utc_plus_3 = Day::of(ts("2024-01-15T09:00:00Z"), TimeZone::fixed(jiff::tz::offset(3)));

        assert_eq!(partition_of(&late, &utc_plus_3), Some(Partition::Today));
        assert_eq!(
            partition_of(&late, &day("2024-01-15T09:00:00Z")),
            Some(Partition::Backlog)
        );
    }

    #[test]
    fn test_views_are_disjoint() {
        let mut done = task("done", Some("2024-01-15T09:00:00Z"));
        done.set_completed(true, ts("2024-01-15T10:00:00Z"));
        let tasks = vec![
            done,
            task("today", Some("2024-01-15T09:00:00Z")),
            task("overdue", Some("2024-01-12T09:00:00Z")),
            task("unscheduled", None),
            task("future", Some("2024-01-20T09:00:00Z")),
        ];
        let now = day("2024-01-15T12:00:00Z");

        let mut seen = std::collections::HashSet::new();
        let views = [today(&tasks, &now), backlog(&tasks, &now), completed(&tasks)];
        for view in &views {
            for t in view {
                assert!(seen.insert(t.id), "task '{}' is in two views", t.title);
            }
        }
        assert_eq!(seen.len(), tasks.len() - 1);
    }
}
