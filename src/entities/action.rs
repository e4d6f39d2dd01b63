//! Task action entity: one typed, orderable step in a task's
//! execution pipeline.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StewardError;

/// Typed action steps a task can decompose into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Research,
    Purchase,
    Email,
    Call,
    Book,
    Delegate,
    Schedule,
    Remind,
    Track,
    Decide,
    Photo,
    Checklist,
}

impl ActionType {
    /// All action types, in the order they are presented to the oracle.
    pub const ALL: [ActionType; 12] = [
        Self::Research,
        Self::Purchase,
        Self::Email,
        Self::Call,
        Self::Book,
        Self::Delegate,
        Self::Schedule,
        Self::Remind,
        Self::Track,
        Self::Decide,
        Self::Photo,
        Self::Checklist,
    ];
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Research => write!(f, "research"),
            Self::Purchase => write!(f, "purchase"),
            Self::Email => write!(f, "email"),
            Self::Call => write!(f, "call"),
            Self::Book => write!(f, "book"),
            Self::Delegate => write!(f, "delegate"),
            Self::Schedule => write!(f, "schedule"),
            Self::Remind => write!(f, "remind"),
            Self::Track => write!(f, "track"),
            Self::Decide => write!(f, "decide"),
            Self::Photo => write!(f, "photo"),
            Self::Checklist => write!(f, "checklist"),
        }
    }
}

impl std::str::FromStr for ActionType {
    type Err = StewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "research" => Ok(Self::Research),
            "purchase" => Ok(Self::Purchase),
            "email" => Ok(Self::Email),
            "call" => Ok(Self::Call),
            "book" => Ok(Self::Book),
            "delegate" => Ok(Self::Delegate),
            "schedule" => Ok(Self::Schedule),
            "remind" => Ok(Self::Remind),
            "track" => Ok(Self::Track),
            "decide" => Ok(Self::Decide),
            "photo" => Ok(Self::Photo),
            "checklist" => Ok(Self::Checklist),
            _ => Err(StewardError::InvalidActionType {
                action_type: s.to_string(),
            }),
        }
    }
}

/// Action lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Skipped,
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Done => write!(f, "done"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = StewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "in-progress" | "inprogress" => Ok(Self::InProgress),
            "done" | "completed" => Ok(Self::Done),
            "skipped" => Ok(Self::Skipped),
            _ => Err(StewardError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// One step in a task's action pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskAction {
    /// Unique identifier
    pub id: String,

    /// Owning task
    pub task_id: String,

    /// Step type
    #[serde(rename = "type")]
    pub action_type: ActionType,

    /// Clear, concise description of the step
    pub label: String,

    #[serde(default)]
    pub status: ActionStatus,

    /// Position in the pipeline. Dense and zero-based at creation time;
    /// never reordered except by full regeneration of the set.
    #[serde(default)]
    pub order_index: u32,

    /// Type-specific details (query for research, product info for
    /// purchase, duration for schedule, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Household member name this step is delegated to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TaskAction {
    /// Create a new pending action
    pub fn new(
        task_id: impl Into<String>,
        action_type: ActionType,
        label: impl Into<String>,
        order_index: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            action_type,
            label: label.into(),
            status: ActionStatus::Pending,
            order_index,
            metadata: HashMap::new(),
            assigned_to: None,
            due_date: None,
            completed_at: None,
            created_at: Some(Utc::now()),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Mark the action done and stamp the completion time
    pub fn complete(&mut self) {
        self.status = ActionStatus::Done;
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_parsing() {
        assert_eq!("research".parse::<ActionType>().unwrap(), ActionType::Research);
        assert_eq!("checklist".parse::<ActionType>().unwrap(), ActionType::Checklist);
        assert!("teleport".parse::<ActionType>().is_err());
    }

    #[test]
    fn test_action_roundtrip_serde() {
        let action = TaskAction::new("t1", ActionType::Purchase, "Order diapers", 0)
            .with_metadata("estimated_price", serde_json::json!("$40"));
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"type\":\"purchase\""));

        let back: TaskAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.action_type, ActionType::Purchase);
        assert_eq!(back.order_index, 0);
    }

    #[test]
    fn test_complete_stamps_time() {
        let mut action = TaskAction::new("t1", ActionType::Call, "Call pediatrician", 1);
        assert!(action.completed_at.is_none());
        action.complete();
        assert_eq!(action.status, ActionStatus::Done);
        assert!(action.completed_at.is_some());
    }
}
