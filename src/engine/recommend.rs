//! "What now" recommendation: pick the best tasks for the current
//! moment.
//!
//! Candidates come from the deterministic selector; ranking is asked
//! of the oracle first and degrades to a pure priority-score ordering
//! when the oracle fails.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::ai::prompts::{CandidateSummary, WhatNowContext};
use crate::ai::schemas::WhatNowOutput;
use crate::ai::{parse_oracle_response, OracleMessage, OracleOptions};
use crate::entities::{Task, TaskStatus, UserProfile};
use crate::errors::{StewardError, StewardResult};

use super::selector::select_candidates;
use super::{Decision, Engine};

const FALLBACK_REASON: &str = "High priority and fits your current context.";
const FALLBACK_CONFIDENCE: f64 = 0.7;
const MAX_FALLBACK_RECOMMENDATIONS: usize = 3;

/// Situational context for a what-now request.
#[derive(Debug, Clone, Default)]
pub struct RecommendationContext {
    /// Minutes available until the next commitment
    pub available_duration_min: Option<u32>,
    /// high, medium, low
    pub energy_level: Option<String>,
    /// home, office, outside
    pub location: Option<String>,
}

/// One recommended task with the reasoning behind it.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub task: Task,
    pub reason: String,
    pub estimated_time_min: u32,
    pub confidence: f64,
}

/// Full what-now answer.
#[derive(Debug, Clone)]
pub struct WhatNow {
    pub recommendations: Vec<Recommendation>,
    pub reasoning: String,
    pub context_summary: String,
}

fn summarize_context(context: &RecommendationContext) -> String {
    format!(
        "available_duration_min: {}, energy_level: {}, location: {}",
        context
            .available_duration_min
            .map_or_else(|| "any".to_string(), |m| m.to_string()),
        context.energy_level.as_deref().unwrap_or("unspecified"),
        context.location.as_deref().unwrap_or("unspecified"),
    )
}

/// Deterministic ranking used when the oracle is unavailable: top
/// candidates by priority score, with a fixed confidence.
pub fn fallback_recommendations(candidates: &[Task], context: &RecommendationContext) -> WhatNow {
    let mut ranked: Vec<&Task> = candidates.iter().collect();
    ranked.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let recommendations = ranked
        .into_iter()
        .take(MAX_FALLBACK_RECOMMENDATIONS)
        .map(|task| Recommendation {
            task: task.clone(),
            reason: FALLBACK_REASON.to_string(),
            estimated_time_min: task.estimated_duration_min.unwrap_or(30),
            confidence: FALLBACK_CONFIDENCE,
        })
        .collect();

    WhatNow {
        recommendations,
        reasoning: "Ranked by priority score because the reasoning service was unavailable."
            .to_string(),
        context_summary: summarize_context(context),
    }
}

impl Engine {
    /// Recommend what to work on right now.
    ///
    /// Only ids present in the candidate set are honored in the oracle
    /// answer; an answer that references no known task counts as a
    /// schema failure and triggers the fallback.
    pub async fn what_now(
        &self,
        user: &UserProfile,
        now: DateTime<Utc>,
        context: &RecommendationContext,
    ) -> StewardResult<Decision<WhatNow>> {
        // Only tasks that have been triaged (or already planned) are
        // ready to be worked on; captured and in-progress tasks stay out
        // of the pool.
        let tasks: Vec<Task> = self
            .storage
            .get_open_tasks(&user.id)
            .await?
            .into_iter()
            .filter(|t| matches!(t.status, TaskStatus::Triaged | TaskStatus::Planned))
            .collect();
        let candidates = select_candidates(tasks, now, context.available_duration_min);

        if candidates.is_empty() {
            return Ok(Decision::from_fallback(WhatNow {
                recommendations: Vec::new(),
                reasoning: "No open tasks match the current context.".to_string(),
                context_summary: summarize_context(context),
            }));
        }

        match self.oracle_what_now(user, now, context, &candidates).await {
            Ok(answer) => Ok(Decision::from_oracle(answer)),
            Err(err) if err.is_oracle() => {
                warn!(user_id = %user.id, error = %err, "oracle recommendation failed, using fallback");
                Ok(Decision::from_fallback(fallback_recommendations(
                    &candidates,
                    context,
                )))
            }
            Err(err) => Err(err),
        }
    }

    async fn oracle_what_now(
        &self,
        user: &UserProfile,
        now: DateTime<Utc>,
        context: &RecommendationContext,
        candidates: &[Task],
    ) -> StewardResult<WhatNow> {
        let summaries: Vec<CandidateSummary> = candidates
            .iter()
            .map(|t| CandidateSummary {
                id: t.id.clone(),
                title: t.title.clone(),
                domain: t.domain.to_string(),
                priority: t.priority.to_string(),
                priority_score: t.priority_score,
                urgency: t.urgency,
                due_date: t.due_date.map(|d| d.to_string()),
                estimated_duration_min: t.estimated_duration_min,
            })
            .collect();

        let prompt_context = WhatNowContext {
            current_time: now.to_rfc3339(),
            available_duration_min: context.available_duration_min,
            energy_level: context.energy_level.clone(),
            location: context.location.clone(),
            candidates_json: serde_json::to_string(&summaries)?,
            user_profile_json: serde_json::to_string(user)?,
        };

        let template = self
            .prompts
            .get("what-now")
            .ok_or_else(|| StewardError::Template {
                reason: "what-now template not found".to_string(),
            })?;
        let (system, user_prompt) = template.render(&prompt_context)?;

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
        let parsed: WhatNowOutput = parse_oracle_response(&response)?;

        // Map ids back to real tasks; unknown ids are dropped.
        let recommendations: Vec<Recommendation> = parsed
            .recommendations
            .into_iter()
            .filter_map(|rec| {
                candidates
                    .iter()
                    .find(|t| t.id == rec.task_id)
                    .map(|task| Recommendation {
                        task: task.clone(),
                        reason: rec.reason,
                        estimated_time_min: rec
                            .estimated_time_min
                            .or(task.estimated_duration_min)
                            .unwrap_or(30),
                        confidence: rec.confidence.unwrap_or(0.8),
                    })
            })
            .collect();

        if recommendations.is_empty() {
            return Err(StewardError::OracleSchema {
                reason: "no recommendation referenced a known candidate".to_string(),
            });
        }

        Ok(WhatNow {
            recommendations,
            reasoning: parsed.reasoning,
            context_summary: parsed.context_summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TaskDomain;

    fn scored_task(id: &str, score: f64, duration: Option<u32>) -> Task {
        let mut task = Task::new(id, "u1", format!("Task {id}"), TaskDomain::Home);
        task.priority_score = score;
        task.estimated_duration_min = duration;
        task
    }

    #[test]
    fn test_fallback_ranks_by_score() {
        let candidates = vec![
            scored_task("low", 1.5, None),
            scored_task("high", 4.2, None),
            scored_task("mid", 3.0, None),
        ];

        let answer = fallback_recommendations(&candidates, &RecommendationContext::default());
        let ids: Vec<&str> = answer
            .recommendations
            .iter()
            .map(|r| r.task.id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_fallback_caps_at_three() {
        let candidates: Vec<Task> = (0..6)
            .map(|i| scored_task(&format!("t{i}"), f64::from(i), None))
            .collect();

        let answer = fallback_recommendations(&candidates, &RecommendationContext::default());
        assert_eq!(answer.recommendations.len(), 3);
    }

    #[test]
    fn test_fallback_uses_fixed_reason_and_confidence() {
        let candidates = vec![scored_task("t1", 2.0, Some(45))];

        let answer = fallback_recommendations(&candidates, &RecommendationContext::default());
        let rec = &answer.recommendations[0];
        assert_eq!(rec.reason, "High priority and fits your current context.");
        assert!((rec.confidence - 0.7).abs() < f64::EPSILON);
        assert_eq!(rec.estimated_time_min, 45);
    }

    #[test]
    fn test_fallback_defaults_missing_duration_to_30() {
        let candidates = vec![scored_task("t1", 2.0, None)];

        let answer = fallback_recommendations(&candidates, &RecommendationContext::default());
        assert_eq!(answer.recommendations[0].estimated_time_min, 30);
    }

    #[test]
    fn test_fallback_reasoning_mentions_service_unavailability() {
        let answer =
            fallback_recommendations(&[scored_task("t1", 2.0, None)], &RecommendationContext::default());
        assert!(answer.reasoning.contains("unavailable"));
    }

    #[test]
    fn test_fallback_summarizes_context() {
        let context = RecommendationContext {
            available_duration_min: Some(45),
            energy_level: Some("low".to_string()),
            location: Some("home".to_string()),
        };

        let answer = fallback_recommendations(&[scored_task("t1", 2.0, None)], &context);
        assert_eq!(
            answer.context_summary,
            "available_duration_min: 45, energy_level: low, location: home"
        );
    }

    #[test]
    fn test_fallback_summary_marks_unset_context_fields() {
        let answer =
            fallback_recommendations(&[scored_task("t1", 2.0, None)], &RecommendationContext::default());
        assert_eq!(
            answer.context_summary,
            "available_duration_min: any, energy_level: unspecified, location: unspecified"
        );
    }
}
