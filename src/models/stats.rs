use serde::Serialize;

use crate::{clock::Day, models::task::Task};

/// Summary derived from the task list. Never edited directly.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_completed: usize,
    pub completed_today: usize,
    pub in_backlog: usize,
    pub daily_limit: u32,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], daily_limit: u32, today: &Day) -> Self {
        let mut stats = TaskStats {
            daily_limit,
            ..TaskStats::default()
        };

        for task in tasks {
            if task.completed {
                stats.total_completed += 1;
                if task.completed_at.is_some_and(|at| today.contains(at)) {
                    stats.completed_today += 1;
                }
            } else if task.scheduled_date.is_none_or(|date| today.is_after(date)) {
                stats.in_backlog += 1;
            }
        }

        stats
    }
}
