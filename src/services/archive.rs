use jiff::{SignedDuration, Timestamp, ToSpan, tz::TimeZone};

use crate::{classifier, clock::Clock, models::task::Task};

/// Completed tasks matching `query` in title or description, newest first.
///
/// An empty query matches everything.
pub fn search_archive<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let query = query.trim().to_lowercase();

    let mut matches: Vec<_> = classifier::completed(tasks)
        .into_iter()
        .filter(|t| {
            query.is_empty()
                || t.title.to_lowercase().contains(&query)
                || t
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
        })
        .collect();

    matches.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    matches
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub total: usize,
    /// Completed within the last 7 days
    pub this_week: usize,
    /// Completed since the same day last month, see [`month_before`]
    pub this_month: usize,
}

pub fn summarize(tasks: &[Task], clock: &impl Clock) -> ArchiveSummary {
    let now = clock.now();
    let week_ago = now
        .checked_sub(SignedDuration::from_hours(7 * 24))
        .unwrap_or(Timestamp::MIN);
    let month_ago = month_before(now, clock.time_zone()).unwrap_or(Timestamp::MIN);

    let completed = classifier::completed(tasks);
    let since = |threshold: Timestamp| {
        completed
            .iter()
            .filter(|t| t.completed_at.is_some_and(|at| at >= threshold))
            .count()
    };

    ArchiveSummary {
        total: completed.len(),
        this_week: since(week_ago),
        this_month: since(month_ago),
    }
}

/// Same day of month and time of day, one month earlier.
///
/// A day past the end of the previous month spills over into the following
/// one, so 31 March goes back to 2 March in a leap year rather than 29 February.
pub fn month_before(now: Timestamp, tz: TimeZone) -> Result<Timestamp, jiff::Error> {
    let zoned = now.to_zoned(tz);
    let first_of_previous = zoned.first_of_month()?.checked_sub(1.month())?;
    let spilled = first_of_previous.checked_add(i32::from(zoned.day() - 1).days())?;
    Ok(spilled.timestamp())
}
