//! Subtask entity.

use serde::{Deserialize, Serialize};

use super::task::TaskStatus;

/// Subtask structure (nested within tasks)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    /// Unique identifier
    pub id: String,

    /// Parent task ID
    pub task_id: String,

    /// Brief, descriptive title
    pub title: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Position within the parent's subtask list
    #[serde(default)]
    pub order_index: u32,
}

impl Subtask {
    /// Create a new subtask
    pub fn new(
        id: impl Into<String>,
        task_id: impl Into<String>,
        title: impl Into<String>,
        order_index: u32,
    ) -> Self {
        Self {
            id: id.into(),
            task_id: task_id.into(),
            title: title.into(),
            status: TaskStatus::Captured,
            order_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtask_new() {
        let subtask = Subtask::new("s1", "t1", "Check pantry", 0);
        assert_eq!(subtask.task_id, "t1");
        assert_eq!(subtask.status, TaskStatus::Captured);
        assert_eq!(subtask.order_index, 0);
    }
}
