//! Daily planning: lay today's open tasks into time slots.
//!
//! Oracle-first with a deterministic packing fallback: top tasks by
//! priority score placed into hourly slots from 09:00, stopping at
//! 18:00.

use chrono::NaiveDate;
use tracing::warn;

use crate::ai::prompts::DailyPlanContext;
use crate::ai::schemas::{DailyPlanItem, DailyPlanOutput};
use crate::ai::{parse_oracle_response, OracleMessage, OracleOptions};
use crate::entities::{Task, UserProfile};
use crate::errors::{StewardError, StewardResult};

use super::{Decision, Engine};

const DAY_START_HOUR: u32 = 9;
const DAY_END_HOUR: u32 = 18;
const MAX_FALLBACK_SLOTS: usize = 6;

/// Deterministic day packing used when the oracle is unavailable.
pub fn fallback_plan(open_tasks: &[Task], date: NaiveDate) -> DailyPlanOutput {
    let mut ranked: Vec<&Task> = open_tasks.iter().collect();
    ranked.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut plan = Vec::new();
    let mut hour = DAY_START_HOUR;
    for task in ranked.into_iter().take(MAX_FALLBACK_SLOTS) {
        if hour >= DAY_END_HOUR {
            break;
        }
        let duration = task.estimated_duration_min.unwrap_or(30);
        plan.push(DailyPlanItem {
            task_id: task.id.clone(),
            task_title: task.title.clone(),
            suggested_time: format!("{date}T{hour:02}:00:00"),
            reason: "Scheduled by priority order.".to_string(),
            estimated_duration_min: duration,
        });
        // Advance in whole hours, at least one per task
        hour += duration.div_ceil(60).max(1);
    }

    DailyPlanOutput {
        plan,
        summary: "Plan built from priority order because the reasoning service was unavailable."
            .to_string(),
    }
}

impl Engine {
    /// Build a plan for the given date from the user's open tasks.
    pub async fn daily_plan(
        &self,
        user: &UserProfile,
        date: NaiveDate,
    ) -> StewardResult<Decision<DailyPlanOutput>> {
        let tasks = self.storage.get_open_tasks(&user.id).await?;

        if tasks.is_empty() {
            return Ok(Decision::from_fallback(DailyPlanOutput {
                plan: Vec::new(),
                summary: "No open tasks to plan.".to_string(),
            }));
        }

        match self.oracle_daily_plan(user, date, &tasks).await {
            Ok(plan) => Ok(Decision::from_oracle(plan)),
            Err(err) if err.is_oracle() => {
                warn!(user_id = %user.id, error = %err, "oracle planning failed, using fallback");
                Ok(Decision::from_fallback(fallback_plan(&tasks, date)))
            }
            Err(err) => Err(err),
        }
    }

    async fn oracle_daily_plan(
        &self,
        user: &UserProfile,
        date: NaiveDate,
        open_tasks: &[Task],
    ) -> StewardResult<DailyPlanOutput> {
        // Trim to the most relevant tasks to keep the prompt bounded
        let mut ranked: Vec<&Task> = open_tasks.iter().collect();
        ranked.sort_by(|a, b| {
            b.priority_score
                .partial_cmp(&a.priority_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(20);

        let context = DailyPlanContext {
            plan_date: date.format("%A, %B %-d, %Y").to_string(),
            open_tasks_json: serde_json::to_string(&ranked)?,
            calendar_context_json: "{}".to_string(),
            user_profile_json: serde_json::to_string(user)?,
        };

        let template = self
            .prompts
            .get("daily-plan")
            .ok_or_else(|| StewardError::Template {
                reason: "daily-plan template not found".to_string(),
            })?;
        let (system, user_prompt) = template.render(&context)?;

        let options = OracleOptions {
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
        let mut parsed: DailyPlanOutput = parse_oracle_response(&response)?;

        // Drop slots that do not reference a real open task
        parsed
            .plan
            .retain(|item| open_tasks.iter().any(|t| t.id == item.task_id));
        if parsed.plan.is_empty() {
            return Err(StewardError::OracleSchema {
                reason: "no plan slot referenced a known task".to_string(),
            });
        }

        Ok(parsed)
    }
}
