//! Task lifecycle operations: capture, update, rescore, planning,
//! nudges, and template seeding.
//!
//! Every mutation that touches priority, due date, domain, or duration
//! recomputes the stored score; the score is never read stale.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::entities::{
    default_household_templates, HouseholdMember, Nudge, Priority, RecurringTemplate, Task,
    TaskAction, TaskDomain, TaskStatus, UserProfile,
};
use crate::errors::{StewardError, StewardResult};
use crate::scoring;

use super::{delegate::delegate_actions, nudges::compute_nudges, Decision, Engine};

/// Input for capturing a new task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub domain: TaskDomain,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub estimated_duration_min: Option<u32>,
    pub source: String,
    pub requires_calendar_block: bool,
}

impl TaskDraft {
    pub fn new(user_id: impl Into<String>, title: impl Into<String>, domain: TaskDomain) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            domain,
            priority: Priority::default(),
            due_date: None,
            estimated_duration_min: None,
            source: "manual".to_string(),
            requires_calendar_block: false,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn duration_min(mut self, minutes: u32) -> Self {
        self.estimated_duration_min = Some(minutes);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update to an existing task. `None` means "leave unchanged";
/// the due date and duration use nested options so they can be cleared
/// explicitly.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub domain: Option<TaskDomain>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub estimated_duration_min: Option<Option<u32>>,
    pub status: Option<TaskStatus>,
}

impl Engine {
    /// Capture a new task, scored at creation time.
    pub async fn create_task(&self, draft: TaskDraft, today: NaiveDate) -> StewardResult<Task> {
        let mut task = Task::new(
            uuid::Uuid::new_v4().to_string(),
            draft.user_id,
            draft.title,
            draft.domain,
        );
        task.description = draft.description;
        task.priority = draft.priority;
        task.due_date = draft.due_date;
        task.estimated_duration_min = draft.estimated_duration_min;
        task.source = draft.source;
        task.requires_calendar_block = draft.requires_calendar_block;
        // Manual capture carries enough detail to score immediately, so
        // the task skips straight to triaged.
        task.status = TaskStatus::Triaged;

        rescore(&self.config.scoring, &mut task, today);
        self.storage.save_task(&task).await?;
        info!(task_id = %task.id, score = task.priority_score, "task captured");
        Ok(task)
    }

    /// Load a task or fail with a typed not-found error.
    pub async fn get_task(&self, task_id: &str) -> StewardResult<Task> {
        self.storage
            .load_task(task_id)
            .await?
            .ok_or_else(|| StewardError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    /// All tasks for a user.
    pub async fn list_tasks(&self, user_id: &str) -> StewardResult<Vec<Task>> {
        self.storage.load_tasks(user_id).await
    }

    /// Open tasks for a user.
    pub async fn open_tasks(&self, user_id: &str) -> StewardResult<Vec<Task>> {
        self.storage.get_open_tasks(user_id).await
    }

    /// Apply a partial update, revalidating status transitions and
    /// rescoring when any score input changed.
    pub async fn update_task(
        &self,
        task_id: &str,
        update: TaskUpdate,
        today: NaiveDate,
    ) -> StewardResult<Task> {
        let mut task = self.get_task(task_id).await?;

        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = Some(description);
        }

        let mut needs_rescore = false;
        if let Some(domain) = update.domain {
            task.domain = domain;
            needs_rescore = true;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
            needs_rescore = true;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
            needs_rescore = true;
        }
        if let Some(duration) = update.estimated_duration_min {
            task.estimated_duration_min = duration;
            needs_rescore = true;
        }

        if let Some(status) = update.status {
            task.set_status(status)?;
        }
        if needs_rescore {
            rescore(&self.config.scoring, &mut task, today);
        }
        task.updated_at = Utc::now();

        self.storage.save_task(&task).await?;
        Ok(task)
    }

    /// Mark a task done.
    pub async fn complete_task(&self, task_id: &str) -> StewardResult<Task> {
        let mut task = self.get_task(task_id).await?;
        task.set_status(TaskStatus::Done)?;
        self.storage.save_task(&task).await?;
        Ok(task)
    }

    /// Cancel a task (the only allowed backwards move).
    pub async fn cancel_task(&self, task_id: &str) -> StewardResult<Task> {
        let mut task = self.get_task(task_id).await?;
        task.set_status(TaskStatus::Cancelled)?;
        self.storage.save_task(&task).await?;
        Ok(task)
    }

    /// Delete a task and its actions.
    pub async fn delete_task(&self, task_id: &str) -> StewardResult<()> {
        if !self.storage.delete_task(task_id).await? {
            return Err(StewardError::TaskNotFound {
                task_id: task_id.to_string(),
            });
        }
        Ok(())
    }

    /// Recompute scores for every open task a user has. Returns the
    /// number of tasks touched.
    pub async fn rescore_open_tasks(&self, user_id: &str, today: NaiveDate) -> StewardResult<usize> {
        let mut tasks = self.storage.get_open_tasks(user_id).await?;
        let count = tasks.len();
        for task in &mut tasks {
            rescore(&self.config.scoring, task, today);
            self.storage.save_task(task).await?;
        }
        debug!(user_id, count, "rescored open tasks");
        Ok(count)
    }

    /// Decompose a task into actions, delegate them across the
    /// household, persist them (replacing any previous set), and move
    /// the task to planned.
    pub async fn plan_task(
        &self,
        task_id: &str,
        user: &UserProfile,
    ) -> StewardResult<Decision<Vec<TaskAction>>> {
        let mut task = self.get_task(task_id).await?;
        let members = self.storage.get_household_members(&user.id).await?;

        let decision = self.decompose_task(&task, user, &members).await?;
        let actions = delegate_actions(&self.config.skills, &task, decision.value, &members);

        self.storage.save_actions(&task.id, &actions).await?;
        if task.status == TaskStatus::Captured
            || task.status == TaskStatus::Parsed
            || task.status == TaskStatus::Triaged
        {
            task.set_status(TaskStatus::Planned)?;
            self.storage.save_task(&task).await?;
        }

        Ok(Decision {
            value: actions,
            source: decision.source,
        })
    }

    /// Queue planning as fire-and-forget background work. Failures are
    /// logged by the dispatcher, never surfaced here.
    pub fn plan_task_background(self: &Arc<Self>, task_id: &str, user: &UserProfile) {
        let engine = Arc::clone(self);
        let task_id = task_id.to_string();
        let user = user.clone();
        self.dispatcher()
            .dispatch(format!("plan-task:{task_id}"), async move {
                engine.plan_task(&task_id, &user).await.map(|_| ())
            });
    }

    /// Actions for a task, in pipeline order.
    pub async fn task_actions(&self, task_id: &str) -> StewardResult<Vec<TaskAction>> {
        self.storage.get_task_actions(task_id).await
    }

    /// Mark one action done.
    pub async fn complete_action(&self, action_id: &str) -> StewardResult<TaskAction> {
        let mut action = self.storage.load_action(action_id).await?.ok_or_else(|| {
            StewardError::ActionNotFound {
                action_id: action_id.to_string(),
            }
        })?;
        action.complete();
        self.storage.update_action(&action).await?;
        Ok(action)
    }

    /// Current nudges for a user's open tasks.
    pub async fn nudges(&self, user_id: &str, today: NaiveDate) -> StewardResult<Vec<Nudge>> {
        let open = self.storage.get_open_tasks(user_id).await?;
        Ok(compute_nudges(&open, today))
    }

    /// Register a household member.
    pub async fn add_member(&self, member: &HouseholdMember) -> StewardResult<()> {
        self.storage.save_member(member).await
    }

    /// Household roster in registration order.
    pub async fn members(&self, user_id: &str) -> StewardResult<Vec<HouseholdMember>> {
        self.storage.get_household_members(user_id).await
    }

    /// Remove a household member.
    pub async fn remove_member(&self, member_id: &str) -> StewardResult<()> {
        if !self.storage.delete_member(member_id).await? {
            return Err(StewardError::MemberNotFound {
                member_id: member_id.to_string(),
            });
        }
        Ok(())
    }

    /// Seed the built-in recurring templates for a user that has none
    /// yet. Returns the templates now on record.
    pub async fn seed_templates(&self, user_id: &str) -> StewardResult<Vec<RecurringTemplate>> {
        let existing = self.storage.get_templates(user_id).await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        let mut seeded = Vec::new();
        for (title, domain, frequency, actions) in default_household_templates() {
            let template = RecurringTemplate::new(
                uuid::Uuid::new_v4().to_string(),
                user_id,
                title,
                domain,
                frequency,
                actions,
            );
            self.storage.save_template(&template).await?;
            seeded.push(template);
        }
        info!(user_id, count = seeded.len(), "seeded default templates");
        Ok(seeded)
    }

    /// Create a task (plus its default actions) from a recurring
    /// template.
    pub async fn instantiate_template(
        &self,
        user_id: &str,
        template_id: &str,
        due_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> StewardResult<(Task, Vec<TaskAction>)> {
        let templates = self.storage.get_templates(user_id).await?;
        let template = templates
            .iter()
            .find(|t| t.id == template_id)
            .ok_or_else(|| StewardError::TemplateNotFound {
                template_id: template_id.to_string(),
            })?;

        let mut draft = TaskDraft::new(user_id, template.title.clone(), template.domain);
        draft.due_date = due_date;
        draft.source = "template".to_string();
        let mut task = self.create_task(draft, today).await?;

        let actions: Vec<TaskAction> = template
            .default_actions
            .iter()
            .enumerate()
            .map(|(i, seed)| {
                let mut action = TaskAction::new(
                    &task.id,
                    seed.action_type,
                    seed.label.clone(),
                    u32::try_from(i).unwrap_or(u32::MAX),
                );
                if let Some(serde_json::Value::Object(map)) = &seed.metadata {
                    action.metadata = map.clone().into_iter().collect();
                }
                action
            })
            .collect();

        self.storage.save_actions(&task.id, &actions).await?;
        task.set_status(TaskStatus::Planned)?;
        self.storage.save_task(&task).await?;

        let mut updated = template.clone();
        updated.last_generated = Some(Utc::now());
        self.storage.save_template(&updated).await?;

        Ok((task, actions))
    }
}

fn rescore(config: &crate::config::ScoringConfig, task: &mut Task, today: NaiveDate) {
    let breakdown = scoring::score(
        config,
        task.domain,
        task.priority,
        task.due_date,
        task.estimated_duration_min,
        today,
    );
    task.priority_score = breakdown.priority_score;
    task.urgency = breakdown.urgency;
    task.importance = breakdown.importance;
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::ai::{OracleMessage, OracleOptions, OracleProvider, OracleResponse};
    use crate::storage::MemoryStorage;

    /// Oracle double that always fails at the transport layer, forcing
    /// every decision onto its fallback.
    struct DownOracle;

    #[async_trait]
    impl OracleProvider for DownOracle {
        fn name(&self) -> &str {
            "down"
        }

        fn is_configured(&self) -> bool {
            false
        }

        async fn generate_text(
            &self,
            _messages: &[OracleMessage],
            _options: &OracleOptions,
        ) -> StewardResult<OracleResponse> {
            Err(StewardError::OracleNotConfigured {
                provider: "down".to_string(),
            })
        }
    }

    fn engine() -> Engine {
        Engine::new(Arc::new(MemoryStorage::new()), Arc::new(DownOracle))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn user() -> UserProfile {
        UserProfile::new("u1", "Sam", "sam@example.com")
    }

    #[tokio::test]
    async fn test_create_task_is_scored() {
        let engine = engine();
        let draft = TaskDraft::new("u1", "Buy car seat", TaskDomain::Family)
            .priority(Priority::Critical)
            .due(today());

        let task = engine.create_task(draft, today()).await.unwrap();
        assert_eq!(task.urgency, 5);
        assert_eq!(task.importance, 5);
        assert!(task.priority_score > 0.0);
    }

    #[tokio::test]
    async fn test_create_task_lands_triaged() {
        let engine = engine();
        let task = engine
            .create_task(TaskDraft::new("u1", "Sort mail", TaskDomain::Home), today())
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Triaged);
    }

    #[tokio::test]
    async fn test_update_priority_rescores() {
        let engine = engine();
        let task = engine
            .create_task(TaskDraft::new("u1", "File taxes", TaskDomain::Personal), today())
            .await
            .unwrap();
        let before = task.priority_score;

        let update = TaskUpdate {
            priority: Some(Priority::Critical),
            ..TaskUpdate::default()
        };
        let updated = engine.update_task(&task.id, update, today()).await.unwrap();
        assert!(updated.priority_score > before);
    }

    #[tokio::test]
    async fn test_update_can_clear_duration() {
        let engine = engine();
        let task = engine
            .create_task(
                TaskDraft::new("u1", "Prune hedge", TaskDomain::Home).duration_min(20),
                today(),
            )
            .await
            .unwrap();
        let before = task.priority_score;

        let update = TaskUpdate {
            estimated_duration_min: Some(None),
            ..TaskUpdate::default()
        };
        let updated = engine.update_task(&task.id, update, today()).await.unwrap();
        assert!(updated.estimated_duration_min.is_none());
        // An unknown duration takes the full effort term, so the score moves up
        assert!(updated.priority_score > before);
    }

    #[tokio::test]
    async fn test_update_title_does_not_rescore() {
        let engine = engine();
        let task = engine
            .create_task(TaskDraft::new("u1", "Old title", TaskDomain::Home), today())
            .await
            .unwrap();

        let update = TaskUpdate {
            title: Some("New title".to_string()),
            ..TaskUpdate::default()
        };
        let updated = engine.update_task(&task.id, update, today()).await.unwrap();
        assert_eq!(updated.title, "New title");
        assert!((updated.priority_score - task.priority_score).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_backwards_status_update_is_rejected() {
        let engine = engine();
        let task = engine
            .create_task(TaskDraft::new("u1", "Task", TaskDomain::Home), today())
            .await
            .unwrap();
        engine.complete_task(&task.id).await.unwrap();

        let update = TaskUpdate {
            status: Some(TaskStatus::Captured),
            ..TaskUpdate::default()
        };
        let result = engine.update_task(&task.id, update, today()).await;
        assert!(matches!(
            result,
            Err(StewardError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_plan_task_persists_fallback_actions_and_advances_status() {
        let engine = engine();
        let mut draft = TaskDraft::new("u1", "Organize garage", TaskDomain::Home);
        draft.estimated_duration_min = Some(120);
        let task = engine.create_task(draft, today()).await.unwrap();

        let decision = engine.plan_task(&task.id, &user()).await.unwrap();
        assert!(decision.is_fallback());
        assert!(!decision.value.is_empty());

        let stored = engine.task_actions(&task.id).await.unwrap();
        assert_eq!(stored.len(), decision.value.len());
        assert_eq!(
            engine.get_task(&task.id).await.unwrap().status,
            TaskStatus::Planned
        );
    }

    #[tokio::test]
    async fn test_plan_task_twice_replaces_actions() {
        let engine = engine();
        let task = engine
            .create_task(TaskDraft::new("u1", "Task", TaskDomain::Home), today())
            .await
            .unwrap();

        engine.plan_task(&task.id, &user()).await.unwrap();
        let first = engine.task_actions(&task.id).await.unwrap();
        engine.plan_task(&task.id, &user()).await.unwrap();
        let second = engine.task_actions(&task.id).await.unwrap();

        // Regeneration replaces, never appends
        assert_eq!(first.len(), second.len());
    }

    #[tokio::test]
    async fn test_plan_task_delegates_to_skilled_member() {
        let engine = engine();
        engine
            .add_member(&HouseholdMember::new(
                "m1",
                "u1",
                "Alex",
                vec!["errands".to_string(), "cleaning".to_string()],
            ))
            .await
            .unwrap();

        let task = engine
            .create_task(TaskDraft::new("u1", "Restock pantry", TaskDomain::Home), today())
            .await
            .unwrap();
        let decision = engine.plan_task(&task.id, &user()).await.unwrap();

        // Home-domain fallback actions match the errands/cleaning skills
        assert!(decision
            .value
            .iter()
            .any(|a| a.assigned_to.as_deref() == Some("Alex")));
    }

    #[tokio::test]
    async fn test_seed_templates_is_idempotent() {
        let engine = engine();
        let first = engine.seed_templates("u1").await.unwrap();
        let second = engine.seed_templates("u1").await.unwrap();
        assert_eq!(first.len(), second.len());
    }

    #[tokio::test]
    async fn test_instantiate_template_creates_task_with_actions() {
        let engine = engine();
        let templates = engine.seed_templates("u1").await.unwrap();
        let grocery = templates
            .iter()
            .find(|t| t.title.contains("grocery"))
            .unwrap();

        let (task, actions) = engine
            .instantiate_template("u1", &grocery.id, Some(today()), today())
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Planned);
        assert_eq!(task.source, "template");
        assert_eq!(actions.len(), grocery.default_actions.len());
    }

    #[tokio::test]
    async fn test_complete_action_stamps_done() {
        let engine = engine();
        let task = engine
            .create_task(TaskDraft::new("u1", "Task", TaskDomain::Home), today())
            .await
            .unwrap();
        engine.plan_task(&task.id, &user()).await.unwrap();

        let actions = engine.task_actions(&task.id).await.unwrap();
        let done = engine.complete_action(&actions[0].id).await.unwrap();
        assert!(done.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_rescore_open_tasks_counts_only_open() {
        let engine = engine();
        let open = engine
            .create_task(TaskDraft::new("u1", "Open", TaskDomain::Home), today())
            .await
            .unwrap();
        let closed = engine
            .create_task(TaskDraft::new("u1", "Closed", TaskDomain::Home), today())
            .await
            .unwrap();
        engine.complete_task(&closed.id).await.unwrap();

        let count = engine.rescore_open_tasks("u1", today()).await.unwrap();
        assert_eq!(count, 1);
        assert!(engine.get_task(&open.id).await.unwrap().priority_score > 0.0);
    }
}
