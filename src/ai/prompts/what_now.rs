//! What-now recommendation prompt template.
//!
//! Asks the oracle to rank the candidate tasks for the current moment.

use serde::Serialize;

use super::PromptTemplate;

/// One candidate task, trimmed for the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub id: String,
    pub title: String,
    pub domain: String,
    pub priority: String,
    pub priority_score: f64,
    pub urgency: u8,
    pub due_date: Option<String>,
    pub estimated_duration_min: Option<u32>,
}

/// Context for the what-now prompt.
#[derive(Debug, Clone, Serialize)]
pub struct WhatNowContext {
    /// ISO timestamp of the request
    pub current_time: String,
    /// Minutes available until the next commitment
    pub available_duration_min: Option<u32>,
    /// high, medium, low
    pub energy_level: Option<String>,
    /// home, office, outside
    pub location: Option<String>,
    /// Candidate tasks, JSON-encoded
    pub candidates_json: String,
    /// User profile, JSON-encoded
    pub user_profile_json: String,
}

/// Get the what-now template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("what-now", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Rank candidate tasks for the current moment")
}

const SYSTEM_PROMPT: &str = r#"You are a recommendation agent for a personal assistant system.
Your job is to suggest the best tasks to do right now based on context.

Consider:
1. Available time until the next commitment
2. Current energy level and location
3. Task priorities and deadlines
4. Context switching costs
5. Time of day appropriateness

Provide 3-5 concrete recommendations with clear reasoning.

IMPORTANT: Your response MUST be a JSON object with this structure:
{
  "recommendations": [
    {
      "task_id": "string",
      "reason": "string",
      "estimated_time_min": 30,
      "confidence": 0.9
    }
  ],
  "reasoning": "string",
  "context_summary": "string"
}

Return ONLY valid JSON - no markdown, no explanations, no additional text.
Only reference task ids present in the candidate list."#;

const USER_PROMPT: &str = r#"Recommend what the user should do now.

Current context:
- Time: {{current_time}}
- Available duration: {{#if available_duration_min}}{{available_duration_min}} minutes{{else}}unknown{{/if}}
- Energy level: {{#if energy_level}}{{energy_level}}{{else}}unknown{{/if}}
- Location: {{#if location}}{{location}}{{else}}unknown{{/if}}

Candidate tasks: {{candidates_json}}

User profile: {{user_profile_json}}

Suggest 3-5 tasks ranked by appropriateness for this moment.
Include estimated time and reasoning for each recommendation."#;
