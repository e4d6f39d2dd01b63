//! Task entity and related types.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Subtask;
use crate::errors::StewardError;

/// Life areas a task can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskDomain {
    Family,
    Home,
    Job,
    Company,
    #[default]
    Personal,
}

impl std::fmt::Display for TaskDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Family => write!(f, "family"),
            Self::Home => write!(f, "home"),
            Self::Job => write!(f, "job"),
            Self::Company => write!(f, "company"),
            Self::Personal => write!(f, "personal"),
        }
    }
}

impl std::str::FromStr for TaskDomain {
    type Err = StewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "family" => Ok(Self::Family),
            "home" => Ok(Self::Home),
            "job" | "work" => Ok(Self::Job),
            "company" | "business" => Ok(Self::Company),
            "personal" => Ok(Self::Personal),
            _ => Err(StewardError::InvalidDomain {
                domain: s.to_string(),
            }),
        }
    }
}

/// Task lifecycle states. Transitions are forward-moving; the only
/// defined backwards move is an explicit cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Captured,
    Parsed,
    Triaged,
    Planned,
    Scheduled,
    InProgress,
    Done,
    Cancelled,
}

impl TaskStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Captured => 0,
            Self::Parsed => 1,
            Self::Triaged => 2,
            Self::Planned => 3,
            Self::Scheduled => 4,
            Self::InProgress => 5,
            Self::Done => 6,
            Self::Cancelled => 7,
        }
    }

    /// Whether the task is still open (not done or cancelled)
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Done | Self::Cancelled)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Captured => write!(f, "captured"),
            Self::Parsed => write!(f, "parsed"),
            Self::Triaged => write!(f, "triaged"),
            Self::Planned => write!(f, "planned"),
            Self::Scheduled => write!(f, "scheduled"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Done => write!(f, "done"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = StewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "captured" => Ok(Self::Captured),
            "parsed" => Ok(Self::Parsed),
            "triaged" => Ok(Self::Triaged),
            "planned" => Ok(Self::Planned),
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" | "in-progress" | "inprogress" => Ok(Self::InProgress),
            "done" | "completed" => Ok(Self::Done),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(StewardError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Declared priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
    Someday,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Someday => write!(f, "someday"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = StewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" | "crit" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" | "med" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "someday" => Ok(Self::Someday),
            _ => Err(StewardError::InvalidPriority {
                priority: s.to_string(),
            }),
        }
    }
}

/// Core task structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Brief, descriptive title
    pub title: String,

    /// Longer free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Life area this task belongs to
    #[serde(default)]
    pub domain: TaskDomain,

    /// Current lifecycle state
    #[serde(default)]
    pub status: TaskStatus,

    /// Declared priority level
    #[serde(default)]
    pub priority: Priority,

    /// Derived priority score (recomputed whenever priority, due date,
    /// domain, or duration changes)
    #[serde(default)]
    pub priority_score: f64,

    /// Derived importance, 1-5, from the declared priority
    #[serde(default = "default_mid_level")]
    pub importance: u8,

    /// Derived urgency, 1-5, from due-date proximity
    #[serde(default = "default_mid_level")]
    pub urgency: u8,

    /// Optional deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Estimated effort in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_min: Option<u32>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// How the task entered the system (voice, manual, calendar)
    #[serde(default = "default_source")]
    pub source: String,

    /// Whether this task wants a dedicated calendar block
    #[serde(default)]
    pub requires_calendar_block: bool,

    /// Calendar event this task was imported from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_calendar_event_id: Option<String>,

    /// Free-form metadata (capture notes, research results, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Ordered subtasks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

fn default_mid_level() -> u8 {
    3
}

fn default_source() -> String {
    "manual".to_string()
}

impl Task {
    /// Create a new task with minimal required fields
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        domain: TaskDomain,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            domain,
            status: TaskStatus::default(),
            priority: Priority::default(),
            priority_score: 0.0,
            importance: 3,
            urgency: 3,
            due_date: None,
            estimated_duration_min: None,
            created_at: now,
            updated_at: now,
            source: default_source(),
            requires_calendar_block: false,
            linked_calendar_event_id: None,
            metadata: HashMap::new(),
            subtasks: Vec::new(),
        }
    }

    /// Update status with transition validation: once past a state, the
    /// only backwards move allowed is an explicit cancel.
    pub fn set_status(&mut self, new_status: TaskStatus) -> Result<(), StewardError> {
        let backwards = new_status.rank() < self.status.rank();
        if backwards && new_status != TaskStatus::Cancelled {
            return Err(StewardError::InvalidTransition {
                task_id: self.id.clone(),
                from: self.status.to_string(),
                to: new_status.to_string(),
            });
        }

        self.status = new_status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Days until the due date, negative when overdue
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.due_date.map(|due| (due - today).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new() {
        let task = Task::new("1", "user-1", "Buy diapers", TaskDomain::Family);
        assert_eq!(task.id, "1");
        assert_eq!(task.title, "Buy diapers");
        assert_eq!(task.status, TaskStatus::Captured);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.source, "manual");
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "triaged".parse::<TaskStatus>().unwrap(),
            TaskStatus::Triaged
        );
        assert_eq!(
            "in-progress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert!("invalid".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_forward_transitions_allowed() {
        let mut task = Task::new("1", "u", "Test", TaskDomain::Home);
        task.set_status(TaskStatus::Triaged).unwrap();
        task.set_status(TaskStatus::InProgress).unwrap();
        task.set_status(TaskStatus::Done).unwrap();
    }

    #[test]
    fn test_backwards_transition_rejected() {
        let mut task = Task::new("1", "u", "Test", TaskDomain::Home);
        task.status = TaskStatus::Done;

        let result = task.set_status(TaskStatus::Captured);
        assert!(matches!(
            result,
            Err(StewardError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_cancel_is_always_allowed() {
        let mut task = Task::new("1", "u", "Test", TaskDomain::Home);
        task.status = TaskStatus::InProgress;
        task.set_status(TaskStatus::Cancelled).unwrap();
        assert!(!task.status.is_open());
    }

    #[test]
    fn test_days_until_due() {
        let mut task = Task::new("1", "u", "Test", TaskDomain::Home);
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(task.days_until_due(today), None);

        task.due_date = NaiveDate::from_ymd_opt(2025, 6, 13);
        assert_eq!(task.days_until_due(today), Some(-2));
    }
}
