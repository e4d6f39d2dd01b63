//! Priority scoring.
//!
//! Pure functions mapping task attributes to a numeric priority score
//! plus derived urgency and importance levels. No I/O and no hidden
//! state; callers persist the result and must recompute it whenever
//! priority, due date, domain, or duration changes.

use chrono::NaiveDate;

use crate::config::ScoringConfig;
use crate::entities::{Priority, TaskDomain};

/// Output of a scoring pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// Weighted score, rounded to two decimal places
    pub priority_score: f64,

    /// 1-5, from due-date proximity
    pub urgency: u8,

    /// 1-5, from the declared priority
    pub importance: u8,
}

/// Importance is a direct lookup from the declared priority
pub fn importance(priority: Priority) -> u8 {
    match priority {
        Priority::Critical => 5,
        Priority::High => 4,
        Priority::Medium => 3,
        Priority::Low => 2,
        Priority::Someday => 1,
    }
}

/// Urgency from days until the deadline. Tasks without a due date sit
/// at medium-low urgency so they neither dominate nor disappear.
pub fn urgency(due_date: Option<NaiveDate>, today: NaiveDate) -> u8 {
    let Some(due) = due_date else {
        return 2;
    };

    let days_until_due = (due - today).num_days();
    match days_until_due {
        i64::MIN..=0 => 5,
        1 => 4,
        2..=3 => 3,
        4..=7 => 2,
        _ => 1,
    }
}

/// Effort term rewarding shorter tasks without a hard cutoff.
/// Durations of zero or unknown are treated alike: ln(0 + 1) is zero,
/// so a zero duration must not reach the division.
pub fn effort_inverse(estimated_duration_min: Option<u32>) -> f64 {
    match estimated_duration_min {
        Some(min) if min > 0 => 1.0 / (f64::from(min) + 1.0).ln(),
        _ => 1.0,
    }
}

/// Compute the full score breakdown for a task's attributes.
///
/// `context_fit` is a constant 1.0 placeholder reserved for future
/// context awareness; it must remain a stable no-op.
pub fn score(
    config: &ScoringConfig,
    domain: TaskDomain,
    priority: Priority,
    due_date: Option<NaiveDate>,
    estimated_duration_min: Option<u32>,
    today: NaiveDate,
) -> ScoreBreakdown {
    let importance = importance(priority);
    let urgency = urgency(due_date, today);
    let effort = effort_inverse(estimated_duration_min);
    let domain_weight = config.domain_weight(domain);
    let context_fit = 1.0;

    let w = &config.weights;
    let raw = w.urgency * f64::from(urgency)
        + w.importance * f64::from(importance)
        + w.effort_inverse * effort
        + w.domain_weight * domain_weight
        + w.context_fit * context_fit;

    ScoreBreakdown {
        priority_score: round2(raw),
        urgency,
        importance,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn day_offset(days: i64) -> Option<NaiveDate> {
        Some(today() + chrono::Duration::days(days))
    }

    #[test]
    fn test_importance_table() {
        assert_eq!(importance(Priority::Critical), 5);
        assert_eq!(importance(Priority::High), 4);
        assert_eq!(importance(Priority::Medium), 3);
        assert_eq!(importance(Priority::Low), 2);
        assert_eq!(importance(Priority::Someday), 1);
    }

    #[test]
    fn test_urgency_buckets() {
        assert_eq!(urgency(None, today()), 2);
        assert_eq!(urgency(day_offset(-2), today()), 5);
        assert_eq!(urgency(day_offset(0), today()), 5);
        assert_eq!(urgency(day_offset(1), today()), 4);
        assert_eq!(urgency(day_offset(2), today()), 3);
        assert_eq!(urgency(day_offset(3), today()), 3);
        assert_eq!(urgency(day_offset(4), today()), 2);
        assert_eq!(urgency(day_offset(7), today()), 2);
        assert_eq!(urgency(day_offset(8), today()), 1);
        assert_eq!(urgency(day_offset(90), today()), 1);
    }

    #[test]
    fn test_effort_inverse_guards_zero_duration() {
        // ln(1) = 0 would divide by zero; zero durations are unknown.
        assert!((effort_inverse(Some(0)) - 1.0).abs() < 1e-9);
        assert!((effort_inverse(None) - 1.0).abs() < 1e-9);
        assert!(effort_inverse(Some(30)) < 1.0);
    }

    #[test]
    fn test_effort_rewards_shorter_tasks() {
        assert!(effort_inverse(Some(10)) > effort_inverse(Some(120)));
    }

    #[test]
    fn test_effort_inverse_handles_max_duration() {
        let value = effort_inverse(Some(u32::MAX));
        assert!(value.is_finite());
        assert!(value > 0.0);
    }

    #[test]
    fn test_critical_family_task_due_today_scores_3_80() {
        let config = ScoringConfig::default();
        let breakdown = score(
            &config,
            TaskDomain::Family,
            Priority::Critical,
            day_offset(0),
            None,
            today(),
        );
        assert_eq!(breakdown.urgency, 5);
        assert_eq!(breakdown.importance, 5);
        // 0.30*5 + 0.40*5 + 0.10*1.0 + 0.15*1.0 + 0.05*1.0 = 3.80
        assert!((breakdown.priority_score - 3.80).abs() < 1e-9);
    }

    #[test]
    fn test_score_monotonic_in_urgency() {
        let config = ScoringConfig::default();
        let mut previous = f64::MIN;
        // Walk due dates from far future to overdue: urgency rises,
        // score must never fall.
        for days in [30, 7, 3, 1, 0].iter() {
            let breakdown = score(
                &config,
                TaskDomain::Home,
                Priority::Medium,
                day_offset(*days),
                Some(45),
                today(),
            );
            assert!(breakdown.priority_score >= previous);
            previous = breakdown.priority_score;
        }
    }

    #[test]
    fn test_score_monotonic_in_importance() {
        let config = ScoringConfig::default();
        let mut previous = f64::MIN;
        for priority in [
            Priority::Someday,
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Critical,
        ] {
            let breakdown = score(
                &config,
                TaskDomain::Home,
                priority,
                day_offset(5),
                Some(45),
                today(),
            );
            assert!(breakdown.priority_score >= previous);
            previous = breakdown.priority_score;
        }
    }

    #[test]
    fn test_score_is_pure() {
        let config = ScoringConfig::default();
        let a = score(
            &config,
            TaskDomain::Job,
            Priority::High,
            day_offset(2),
            Some(60),
            today(),
        );
        let b = score(
            &config,
            TaskDomain::Job,
            Priority::High,
            day_offset(2),
            Some(60),
            today(),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_rounded_to_two_decimals() {
        let config = ScoringConfig::default();
        let breakdown = score(
            &config,
            TaskDomain::Personal,
            Priority::Low,
            day_offset(10),
            Some(37),
            today(),
        );
        let scaled = breakdown.priority_score * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
