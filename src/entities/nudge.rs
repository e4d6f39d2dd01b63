//! Nudge entity: ephemeral notifications derived from the open task
//! set. Never persisted.

use serde::{Deserialize, Serialize};

use crate::errors::StewardError;

/// Nudge kinds, ordered by display priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeType {
    Overdue,
    DueSoon,
    Suggestion,
    Reminder,
}

impl NudgeType {
    /// Sort key: overdue nudges surface first
    pub fn sort_rank(self) -> u8 {
        match self {
            Self::Overdue => 0,
            Self::DueSoon => 1,
            Self::Suggestion => 2,
            Self::Reminder => 3,
        }
    }
}

impl std::fmt::Display for NudgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overdue => write!(f, "overdue"),
            Self::DueSoon => write!(f, "due_soon"),
            Self::Suggestion => write!(f, "suggestion"),
            Self::Reminder => write!(f, "reminder"),
        }
    }
}

impl std::str::FromStr for NudgeType {
    type Err = StewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overdue" => Ok(Self::Overdue),
            "due_soon" | "due-soon" => Ok(Self::DueSoon),
            "suggestion" => Ok(Self::Suggestion),
            "reminder" => Ok(Self::Reminder),
            _ => Err(StewardError::InvalidNudgeType {
                nudge_type: s.to_string(),
            }),
        }
    }
}

/// A single notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nudge {
    #[serde(rename = "type")]
    pub nudge_type: NudgeType,

    /// Human-readable message
    pub message: String,

    /// Task this nudge refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Suggested client action verb (view_task, start_task, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}
