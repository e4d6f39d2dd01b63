//! Workflow decomposition: expand one task into an ordered pipeline
//! of typed action steps.
//!
//! Primary path asks the oracle; any oracle failure degrades to a
//! deterministic generator driven by duration, domain, and calendar
//! heuristics.

use tracing::warn;

use crate::ai::prompts::{DecomposeTaskContext, MemberSummary};
use crate::ai::schemas::WorkflowOutput;
use crate::ai::{parse_oracle_response, OracleMessage, OracleOptions};
use crate::entities::{ActionType, HouseholdMember, Task, TaskAction, UserProfile};
use crate::errors::{StewardError, StewardResult};

use super::{Decision, Engine};

/// Deterministic decomposition used when the oracle is unavailable.
pub fn fallback_actions(task: &Task) -> Vec<TaskAction> {
    let mut actions = Vec::new();
    let mut idx = 0;

    // Non-trivial tasks start with a research step
    if task.estimated_duration_min.is_some_and(|d| d > 15) {
        actions.push(
            TaskAction::new(
                &task.id,
                ActionType::Research,
                format!("Research: {}", task.title),
                idx,
            )
            .with_metadata("query", serde_json::json!(task.title)),
        );
        idx += 1;
    }

    // Family and home work usually wants an explicit plan
    if matches!(
        task.domain,
        crate::entities::TaskDomain::Family | crate::entities::TaskDomain::Home
    ) {
        actions.push(TaskAction::new(
            &task.id,
            ActionType::Checklist,
            format!("Plan approach for: {}", task.title),
            idx,
        ));
        idx += 1;
    }

    if task.requires_calendar_block {
        actions.push(
            TaskAction::new(
                &task.id,
                ActionType::Schedule,
                format!("Block time for: {}", task.title),
                idx,
            )
            .with_metadata(
                "duration_min",
                serde_json::json!(task.estimated_duration_min.unwrap_or(30)),
            ),
        );
        idx += 1;
    }

    // Always terminate with a completion step
    actions.push(TaskAction::new(
        &task.id,
        ActionType::Checklist,
        format!("Complete: {}", task.title),
        idx,
    ));

    actions
}

impl Engine {
    /// Decompose a task into an ordered action pipeline.
    ///
    /// Emitted actions carry dense zero-based order indexes and are
    /// bound to the task's identity regardless of what the oracle
    /// claimed.
    pub async fn decompose_task(
        &self,
        task: &Task,
        user: &UserProfile,
        members: &[HouseholdMember],
    ) -> StewardResult<Decision<Vec<TaskAction>>> {
        match self.oracle_decompose(task, user, members).await {
            Ok(actions) => Ok(Decision::from_oracle(actions)),
            Err(err) if err.is_oracle() => {
                warn!(task_id = %task.id, error = %err, "oracle decomposition failed, using fallback");
                Ok(Decision::from_fallback(fallback_actions(task)))
            }
            Err(err) => Err(err),
        }
    }

    async fn oracle_decompose(
        &self,
        task: &Task,
        user: &UserProfile,
        members: &[HouseholdMember],
    ) -> StewardResult<Vec<TaskAction>> {
        let context = DecomposeTaskContext {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_else(|| "N/A".to_string()),
            domain: task.domain.to_string(),
            priority: task.priority.to_string(),
            due_date: task.due_date.map(|d| d.to_string()),
            estimated_duration_min: task.estimated_duration_min,
            user_profile_json: serde_json::to_string(user)?,
            members: members
                .iter()
                .map(|m| MemberSummary {
                    name: m.name.clone(),
                    role: m.role.clone(),
                    skills: m.skills.clone(),
                    is_external: m.is_external,
                })
                .collect(),
        };

        let template =
            self.prompts
                .get("decompose-task")
                .ok_or_else(|| StewardError::Template {
                    reason: "decompose-task template not found".to_string(),
                })?;
        let (system, user_prompt) = template.render(&context)?;

        let options = OracleOptions {
            temperature: Some(0.3),
            timeout: self.config.oracle_timeout,
            ..OracleOptions::default()
        };

        let response = self
            .oracle
            .generate_text(
                &[OracleMessage::system(system), OracleMessage::user(user_prompt)],
                &options,
            )
            .await?;
        let parsed: WorkflowOutput = parse_oracle_response(&response)?;

        if parsed.actions.is_empty() || parsed.actions.len() > 8 {
            return Err(StewardError::OracleSchema {
                reason: format!(
                    "expected 1-8 actions, oracle returned {}",
                    parsed.actions.len()
                ),
            });
        }

        // Re-bind to the task and assign dense order indexes
        let actions = parsed
            .actions
            .into_iter()
            .enumerate()
            .map(|(i, generated)| {
                let mut action = TaskAction::new(
                    &task.id,
                    generated.action_type,
                    generated.label,
                    u32::try_from(i).unwrap_or(u32::MAX),
                );
                action.assigned_to = generated.assigned_to;
                action.metadata = generated.metadata;
                action
            })
            .collect();

        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TaskDomain;

    fn base_task(domain: TaskDomain) -> Task {
        Task::new("t1", "u1", "Fix the fence", domain)
    }

    #[test]
    fn test_fallback_minimal_task_gets_single_checklist() {
        let task = base_task(TaskDomain::Personal);
        let actions = fallback_actions(&task);

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action_type, ActionType::Checklist);
        assert!(actions[0].label.starts_with("Complete:"));
    }

    #[test]
    fn test_fallback_long_task_starts_with_research() {
        let mut task = base_task(TaskDomain::Personal);
        task.estimated_duration_min = Some(45);

        let actions = fallback_actions(&task);
        assert_eq!(actions[0].action_type, ActionType::Research);
    }

    #[test]
    fn test_fallback_short_task_skips_research() {
        let mut task = base_task(TaskDomain::Personal);
        task.estimated_duration_min = Some(10);

        let actions = fallback_actions(&task);
        assert!(actions.iter().all(|a| a.action_type != ActionType::Research));
    }

    #[test]
    fn test_fallback_home_domain_adds_planning_step() {
        let task = base_task(TaskDomain::Home);
        let actions = fallback_actions(&task);

        assert_eq!(actions[0].action_type, ActionType::Checklist);
        assert!(actions[0].label.starts_with("Plan approach"));
    }

    #[test]
    fn test_fallback_calendar_block_adds_schedule_with_duration() {
        let mut task = base_task(TaskDomain::Job);
        task.requires_calendar_block = true;
        task.estimated_duration_min = Some(90);

        let actions = fallback_actions(&task);
        let schedule = actions
            .iter()
            .find(|a| a.action_type == ActionType::Schedule)
            .unwrap();
        assert_eq!(schedule.metadata["duration_min"], serde_json::json!(90));
    }

    #[test]
    fn test_fallback_schedule_duration_defaults_to_30() {
        let mut task = base_task(TaskDomain::Job);
        task.requires_calendar_block = true;

        let actions = fallback_actions(&task);
        let schedule = actions
            .iter()
            .find(|a| a.action_type == ActionType::Schedule)
            .unwrap();
        assert_eq!(schedule.metadata["duration_min"], serde_json::json!(30));
    }

    #[test]
    fn test_fallback_order_indexes_are_dense() {
        let mut task = base_task(TaskDomain::Family);
        task.estimated_duration_min = Some(60);
        task.requires_calendar_block = true;

        let actions = fallback_actions(&task);
        assert_eq!(actions.len(), 4);
        for (i, action) in actions.iter().enumerate() {
            assert_eq!(action.order_index as usize, i);
            assert_eq!(action.task_id, "t1");
        }
    }
}
