//! Daily plan prompt template.

use serde::Serialize;

use super::PromptTemplate;

/// Context for the daily-plan prompt.
#[derive(Debug, Clone, Serialize)]
pub struct DailyPlanContext {
    /// Human-readable plan date, e.g. "Friday, August 29, 2025"
    pub plan_date: String,
    /// Open tasks (at most the 20 most relevant), JSON-encoded
    pub open_tasks_json: String,
    /// Work hours, busy periods, upcoming events, JSON-encoded
    pub calendar_context_json: String,
    /// User profile, JSON-encoded
    pub user_profile_json: String,
}

/// Get the daily-plan template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("daily-plan", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Create an optimized daily schedule from open tasks")
}

const SYSTEM_PROMPT: &str = r#"You are a daily planning agent for a personal assistant system.
Your job is to create an optimized daily schedule from the user's open tasks.

Consider:
1. Task priority scores and deadlines (overdue tasks go first)
2. Estimated duration for each task
3. Existing calendar commitments (avoid conflicts)
4. Energy patterns: high-effort tasks in the morning, lighter tasks afternoon
5. Include breaks between focused work sessions
6. Be realistic about what fits in one day

IMPORTANT: Your response MUST be a JSON object with this structure:
{
  "plan": [
    {
      "task_id": "string",
      "task_title": "string",
      "suggested_time": "2025-01-01T09:00:00",
      "reason": "string",
      "estimated_duration_min": 30
    }
  ],
  "summary": "string"
}

Return ONLY valid JSON - no markdown, no explanations, no additional text."#;

const USER_PROMPT: &str = r#"Create a daily plan for today ({{plan_date}}).

Open tasks: {{open_tasks_json}}

Calendar context: {{calendar_context_json}}

User profile: {{user_profile_json}}

Pick the most important 5-8 tasks that fit today.
Assign realistic time slots and provide brief reasoning."#;
