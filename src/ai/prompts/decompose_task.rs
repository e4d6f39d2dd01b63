//! Workflow decomposition prompt template.
//!
//! Asks the oracle to break one task into a pipeline of typed action
//! steps drawn from the fixed action-type enumeration.

use serde::Serialize;

use super::PromptTemplate;

/// One household member, trimmed for the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub name: String,
    pub role: String,
    pub skills: Vec<String>,
    pub is_external: bool,
}

/// Context for the decompose-task prompt.
#[derive(Debug, Clone, Serialize)]
pub struct DecomposeTaskContext {
    pub title: String,
    pub description: String,
    pub domain: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub estimated_duration_min: Option<u32>,
    pub user_profile_json: String,
    pub members: Vec<MemberSummary>,
}

/// Get the decompose-task template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("decompose-task", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Break a task into typed action steps")
}

const SYSTEM_PROMPT: &str = r#"You are a workflow decomposition agent for a household assistant system.
Your job is to take a task and break it into concrete, typed action steps.

Available action types (use the exact string values):
- "research"   : Search the internet, compare options, gather information
- "purchase"   : Buy an item (include product_name, estimated price)
- "email"      : Draft or send an email (include to, subject hint)
- "call"       : Make a phone call (include who, phone if known)
- "book"       : Book an appointment (include provider_name, preferred_times)
- "delegate"   : Assign to a household member (include assigned_to name)
- "schedule"   : Block time on the calendar (include duration_min)
- "remind"     : Set a reminder (include remind_at hint)
- "track"      : Track delivery or progress
- "decide"     : Present options for a decision (requires research first)
- "photo"      : Take or attach a photo for context
- "checklist"  : Simple checkbox item

Rules:
1. Order actions logically (research before decide, decide before purchase)
2. For complex tasks, use 3-8 actions. For simple tasks, 1-3 actions.
3. If household members are available, suggest delegation where appropriate.
4. Include a "label" that is a clear, concise description of the step.
5. Put delegation suggestions in the "assigned_to" field.
6. Use metadata for type-specific details (query for research, product info for purchase, etc.)

IMPORTANT: Your response MUST be a JSON object with this structure:
{
  "actions": [
    {
      "type": "research",
      "label": "string",
      "assigned_to": null,
      "metadata": {}
    }
  ],
  "reasoning": "string"
}

Return ONLY valid JSON - no markdown, no explanations, no additional text."#;

const USER_PROMPT: &str = r#"Decompose this task into action steps:

Task: {{title}}
Description: {{description}}
Domain: {{domain}}
Priority: {{priority}}
Due date: {{#if due_date}}{{due_date}}{{else}}None{{/if}}
Estimated duration: {{#if estimated_duration_min}}{{estimated_duration_min}} min{{else}}Unknown{{/if}}

User profile: {{user_profile_json}}

Household members available for delegation:
{{#each members}}- {{this.name}} (role: {{this.role}}, skills: {{#each this.skills}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}, external: {{this.is_external}})
{{else}}None configured
{{/each}}

Create a logical sequence of typed action steps."#;
