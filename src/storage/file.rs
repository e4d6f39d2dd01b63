//! JSON-file storage backend.
//!
//! Persists the whole store as one JSON document under a
//! `.steward/` directory, reading and rewriting the document per
//! operation. Fine for a single-user CLI; anything heavier belongs
//! behind a real database.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use crate::entities::{HouseholdMember, RecurringTemplate, Task, TaskAction};
use crate::errors::{StewardError, StewardResult};

use super::Storage;

/// On-disk document shape
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    actions: HashMap<String, Vec<TaskAction>>,
    #[serde(default)]
    members: Vec<HouseholdMember>,
    #[serde(default)]
    templates: Vec<RecurringTemplate>,
}

/// File-backed store rooted at `<project>/.steward/store.json`
pub struct FileStorage {
    store_path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(project_path: impl AsRef<Path>) -> Self {
        Self {
            store_path: project_path.as_ref().join(".steward/store.json"),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> StewardResult<StoreDocument> {
        match fs::read_to_string(&self.store_path).await {
            Ok(content) => {
                let doc: StoreDocument = serde_json::from_str(&content)?;
                Ok(doc)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StewardError::NotInitialized),
            Err(e) => Err(StewardError::FileRead {
                path: self.store_path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn save(&self, doc: &StoreDocument) -> StewardResult<()> {
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(doc)?;
        fs::write(&self.store_path, content)
            .await
            .map_err(|e| StewardError::FileWrite {
                path: self.store_path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> StewardResult<()> {
        if self.is_initialized().await? {
            return Ok(());
        }
        self.save(&StoreDocument::default()).await
    }

    async fn is_initialized(&self) -> StewardResult<bool> {
        Ok(fs::try_exists(&self.store_path).await.unwrap_or(false))
    }

    fn storage_type(&self) -> &'static str {
        "file"
    }

    async fn load_tasks(&self, user_id: &str) -> StewardResult<Vec<Task>> {
        let doc = self.load().await?;
        Ok(doc
            .tasks
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect())
    }

    async fn get_open_tasks(&self, user_id: &str) -> StewardResult<Vec<Task>> {
        let all = self.load_tasks(user_id).await?;
        Ok(all.into_iter().filter(|t| t.status.is_open()).collect())
    }

    async fn load_task(&self, task_id: &str) -> StewardResult<Option<Task>> {
        let doc = self.load().await?;
        Ok(doc.tasks.into_iter().find(|t| t.id == task_id))
    }

    async fn save_task(&self, task: &Task) -> StewardResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        if let Some(existing) = doc.tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task.clone();
        } else {
            doc.tasks.push(task.clone());
        }
        self.save(&doc).await
    }

    async fn delete_task(&self, task_id: &str) -> StewardResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let before = doc.tasks.len();
        doc.tasks.retain(|t| t.id != task_id);
        let removed = doc.tasks.len() < before;
        if removed {
            doc.actions.remove(task_id);
            self.save(&doc).await?;
        }
        Ok(removed)
    }

    async fn save_actions(&self, task_id: &str, actions: &[TaskAction]) -> StewardResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        doc.actions.insert(task_id.to_string(), actions.to_vec());
        self.save(&doc).await
    }

    async fn get_task_actions(&self, task_id: &str) -> StewardResult<Vec<TaskAction>> {
        let doc = self.load().await?;
        let mut actions = doc.actions.get(task_id).cloned().unwrap_or_default();
        actions.sort_by_key(|a| a.order_index);
        Ok(actions)
    }

    async fn load_action(&self, action_id: &str) -> StewardResult<Option<TaskAction>> {
        let doc = self.load().await?;
        Ok(doc
            .actions
            .values()
            .flatten()
            .find(|a| a.id == action_id)
            .cloned())
    }

    async fn update_action(&self, action: &TaskAction) -> StewardResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        if let Some(set) = doc.actions.get_mut(&action.task_id) {
            if let Some(existing) = set.iter_mut().find(|a| a.id == action.id) {
                *existing = action.clone();
            }
        }
        self.save(&doc).await
    }

    async fn get_household_members(&self, user_id: &str) -> StewardResult<Vec<HouseholdMember>> {
        let doc = self.load().await?;
        Ok(doc
            .members
            .into_iter()
            .filter(|m| m.user_id == user_id)
            .collect())
    }

    async fn save_member(&self, member: &HouseholdMember) -> StewardResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        if let Some(existing) = doc.members.iter_mut().find(|m| m.id == member.id) {
            *existing = member.clone();
        } else {
            doc.members.push(member.clone());
        }
        self.save(&doc).await
    }

    async fn delete_member(&self, member_id: &str) -> StewardResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let before = doc.members.len();
        doc.members.retain(|m| m.id != member_id);
        let removed = doc.members.len() < before;
        if removed {
            self.save(&doc).await?;
        }
        Ok(removed)
    }

    async fn get_templates(&self, user_id: &str) -> StewardResult<Vec<RecurringTemplate>> {
        let doc = self.load().await?;
        Ok(doc
            .templates
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect())
    }

    async fn save_template(&self, template: &RecurringTemplate) -> StewardResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        if let Some(existing) = doc.templates.iter_mut().find(|t| t.id == template.id) {
            *existing = template.clone();
        } else {
            doc.templates.push(template.clone());
        }
        self.save(&doc).await
    }
}
