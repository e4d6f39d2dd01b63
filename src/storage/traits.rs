//! Storage trait definitions.
//!
//! The record store is an external collaborator; the engine only
//! depends on this interface.

use async_trait::async_trait;

use crate::entities::{HouseholdMember, RecurringTemplate, Task, TaskAction};
use crate::errors::StewardResult;

/// Storage interface for task persistence
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize storage (create directories, etc.)
    async fn initialize(&self) -> StewardResult<()>;

    /// Check if storage is initialized
    async fn is_initialized(&self) -> StewardResult<bool>;

    /// Get storage type identifier
    fn storage_type(&self) -> &'static str;

    // === Task operations ===

    /// Load all tasks for a user
    async fn load_tasks(&self, user_id: &str) -> StewardResult<Vec<Task>>;

    /// Load all open (not done/cancelled) tasks for a user
    async fn get_open_tasks(&self, user_id: &str) -> StewardResult<Vec<Task>>;

    /// Load a single task by ID
    async fn load_task(&self, task_id: &str) -> StewardResult<Option<Task>>;

    /// Insert or update a task
    async fn save_task(&self, task: &Task) -> StewardResult<()>;

    /// Delete a task and its actions
    async fn delete_task(&self, task_id: &str) -> StewardResult<bool>;

    // === Action operations ===

    /// Replace the full action set of a task. Regeneration is
    /// replace-not-append so double dispatch cannot duplicate steps.
    async fn save_actions(&self, task_id: &str, actions: &[TaskAction]) -> StewardResult<()>;

    /// Load a task's actions ordered by pipeline position
    async fn get_task_actions(&self, task_id: &str) -> StewardResult<Vec<TaskAction>>;

    /// Load a single action by ID
    async fn load_action(&self, action_id: &str) -> StewardResult<Option<TaskAction>>;

    /// Update a single action in place
    async fn update_action(&self, action: &TaskAction) -> StewardResult<()>;

    // === Household operations ===

    /// Household members in registration order (delegation is
    /// order-sensitive on the roster)
    async fn get_household_members(&self, user_id: &str) -> StewardResult<Vec<HouseholdMember>>;

    /// Register or update a member
    async fn save_member(&self, member: &HouseholdMember) -> StewardResult<()>;

    /// Remove a member
    async fn delete_member(&self, member_id: &str) -> StewardResult<bool>;

    // === Recurring templates ===

    /// All templates for a user
    async fn get_templates(&self, user_id: &str) -> StewardResult<Vec<RecurringTemplate>>;

    /// Save a template
    async fn save_template(&self, template: &RecurringTemplate) -> StewardResult<()>;
}
