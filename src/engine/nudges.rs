//! Nudge generation: a deterministic scan of open tasks producing
//! overdue and due-soon notifications.

use chrono::NaiveDate;

use crate::entities::{Nudge, NudgeType, Task};

/// At most this many nudges are returned
const MAX_NUDGES: usize = 10;

/// Due within this many days still warrants a due-soon nudge
const DUE_SOON_DAYS: i64 = 3;

/// Compute nudges for the given open tasks. Tasks without a due date
/// are skipped.
pub fn compute_nudges(open_tasks: &[Task], today: NaiveDate) -> Vec<Nudge> {
    let mut nudges: Vec<Nudge> = Vec::new();

    for task in open_tasks {
        let Some(days) = task.days_until_due(today) else {
            continue;
        };

        let nudge = if days < 0 {
            let overdue_by = -days;
            Nudge {
                nudge_type: NudgeType::Overdue,
                message: format!(
                    "'{}' is overdue by {} day{}",
                    task.title,
                    overdue_by,
                    plural(overdue_by)
                ),
                task_id: Some(task.id.clone()),
                action: Some("view_task".to_string()),
            }
        } else if days == 0 {
            Nudge {
                nudge_type: NudgeType::DueSoon,
                message: format!("'{}' is due today", task.title),
                task_id: Some(task.id.clone()),
                action: Some("start_task".to_string()),
            }
        } else if days <= DUE_SOON_DAYS {
            Nudge {
                nudge_type: NudgeType::DueSoon,
                message: format!("'{}' is due in {} day{}", task.title, days, plural(days)),
                task_id: Some(task.id.clone()),
                action: Some("view_task".to_string()),
            }
        } else {
            continue;
        };

        nudges.push(nudge);
    }

    // Stable sort: overdue first, original order otherwise
    nudges.sort_by_key(|n| n.nudge_type.sort_rank());
    nudges.truncate(MAX_NUDGES);
    nudges
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
