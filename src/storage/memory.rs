//! In-memory storage backend, used by tests and as the default.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entities::{HouseholdMember, RecurringTemplate, Task, TaskAction};
use crate::errors::StewardResult;

use super::Storage;

/// Volatile map-backed store
#[derive(Default)]
pub struct MemoryStorage {
    tasks: RwLock<HashMap<String, Task>>,
    /// Keyed by task id; the inner vec is the task's full action set
    actions: RwLock<HashMap<String, Vec<TaskAction>>>,
    /// Kept as a vec to preserve registration order
    members: RwLock<Vec<HouseholdMember>>,
    templates: RwLock<Vec<RecurringTemplate>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> StewardResult<()> {
        Ok(())
    }

    async fn is_initialized(&self) -> StewardResult<bool> {
        Ok(true)
    }

    fn storage_type(&self) -> &'static str {
        "memory"
    }

    async fn load_tasks(&self, user_id: &str) -> StewardResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut found: Vec<Task> = tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn get_open_tasks(&self, user_id: &str) -> StewardResult<Vec<Task>> {
        let all = self.load_tasks(user_id).await?;
        Ok(all.into_iter().filter(|t| t.status.is_open()).collect())
    }

    async fn load_task(&self, task_id: &str) -> StewardResult<Option<Task>> {
        Ok(self.tasks.read().await.get(task_id).cloned())
    }

    async fn save_task(&self, task: &Task) -> StewardResult<()> {
        self.tasks
            .write()
            .await
            .insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn delete_task(&self, task_id: &str) -> StewardResult<bool> {
        let removed = self.tasks.write().await.remove(task_id).is_some();
        if removed {
            self.actions.write().await.remove(task_id);
        }
        Ok(removed)
    }

    async fn save_actions(&self, task_id: &str, actions: &[TaskAction]) -> StewardResult<()> {
        self.actions
            .write()
            .await
            .insert(task_id.to_string(), actions.to_vec());
        Ok(())
    }

    async fn get_task_actions(&self, task_id: &str) -> StewardResult<Vec<TaskAction>> {
        let mut actions = self
            .actions
            .read()
            .await
            .get(task_id)
            .cloned()
            .unwrap_or_default();
        actions.sort_by_key(|a| a.order_index);
        Ok(actions)
    }

    async fn load_action(&self, action_id: &str) -> StewardResult<Option<TaskAction>> {
        let actions = self.actions.read().await;
        Ok(actions
            .values()
            .flatten()
            .find(|a| a.id == action_id)
            .cloned())
    }

    async fn update_action(&self, action: &TaskAction) -> StewardResult<()> {
        let mut actions = self.actions.write().await;
        if let Some(set) = actions.get_mut(&action.task_id) {
            if let Some(existing) = set.iter_mut().find(|a| a.id == action.id) {
                *existing = action.clone();
            }
        }
        Ok(())
    }

    async fn get_household_members(&self, user_id: &str) -> StewardResult<Vec<HouseholdMember>> {
        Ok(self
            .members
            .read()
            .await
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_member(&self, member: &HouseholdMember) -> StewardResult<()> {
        let mut members = self.members.write().await;
        if let Some(existing) = members.iter_mut().find(|m| m.id == member.id) {
            *existing = member.clone();
        } else {
            members.push(member.clone());
        }
        Ok(())
    }

    async fn delete_member(&self, member_id: &str) -> StewardResult<bool> {
        let mut members = self.members.write().await;
        let before = members.len();
        members.retain(|m| m.id != member_id);
        Ok(members.len() < before)
    }

    async fn get_templates(&self, user_id: &str) -> StewardResult<Vec<RecurringTemplate>> {
        Ok(self
            .templates
            .read()
            .await
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_template(&self, template: &RecurringTemplate) -> StewardResult<()> {
        let mut templates = self.templates.write().await;
        if let Some(existing) = templates.iter_mut().find(|t| t.id == template.id) {
            *existing = template.clone();
        } else {
            templates.push(template.clone());
        }
        Ok(())
    }
}
