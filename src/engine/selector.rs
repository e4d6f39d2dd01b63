//! Candidate selection for "what should I do now" queries.
//!
//! Open tasks are bucketed by due-date proximity and only the first
//! non-empty bucket is surfaced. Note the consequence: tasks due in
//! the far future are starved for as long as nearer-term work keeps
//! arriving. Intentional; distant deadlines become near ones soon
//! enough.

use chrono::{DateTime, Utc};

use crate::entities::Task;

/// Due within this many days counts as "near"
const NEAR_DAYS: i64 = 7;

/// Due beyond this many days counts as "far future"
const FAR_FUTURE_DAYS: i64 = 30;

/// At most this many candidates are returned
const MAX_CANDIDATES: usize = 10;

/// Select a ranked shortlist of tasks for the given moment.
///
/// `max_duration` drops tasks whose known duration exceeds the
/// available window; tasks with unknown duration always pass.
pub fn select_candidates(
    tasks: Vec<Task>,
    now: DateTime<Utc>,
    max_duration: Option<u32>,
) -> Vec<Task> {
    let today = now.date_naive();

    let mut near = Vec::new();
    let mut medium = Vec::new();
    let mut far = Vec::new();

    for task in tasks {
        match task.days_until_due(today) {
            // No due date: medium term
            None => medium.push(task),
            Some(days) if days <= NEAR_DAYS => near.push(task),
            Some(days) if days <= FAR_FUTURE_DAYS => medium.push(task),
            Some(_) => far.push(task),
        }
    }

    // Pool is the first non-empty bucket: near → medium → far
    let pool = if !near.is_empty() {
        near
    } else if !medium.is_empty() {
        medium
    } else {
        far
    };

    let mut candidates: Vec<Task> = match max_duration {
        Some(limit) => pool
            .into_iter()
            .filter(|t| t.estimated_duration_min.is_none_or(|d| d <= limit))
            .collect(),
        None => pool,
    };

    // Urgency first, priority score as the tie-break, both descending
    candidates.sort_by(|a, b| {
        b.urgency.cmp(&a.urgency).then(
            b.priority_score
                .partial_cmp(&a.priority_score)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    candidates.truncate(MAX_CANDIDATES);
    candidates
}
