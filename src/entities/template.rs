//! Recurring templates: default action lists for tasks a household
//! runs over and over. Consumed only to seed new Task/TaskAction
//! instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::ActionType;
use super::task::TaskDomain;

/// One seeded action inside a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,

    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl TemplateAction {
    fn new(action_type: ActionType, label: &str) -> Self {
        Self {
            action_type,
            label: label.to_string(),
            metadata: None,
        }
    }

    fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A recurring task blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: String,

    pub user_id: String,

    pub title: String,

    #[serde(default)]
    pub domain: TaskDomain,

    /// weekly, biweekly, monthly, custom
    #[serde(default = "default_frequency")]
    pub frequency: String,

    #[serde(default)]
    pub default_actions: Vec<TemplateAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_generated: Option<DateTime<Utc>>,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_frequency() -> String {
    "weekly".to_string()
}

fn default_active() -> bool {
    true
}

impl RecurringTemplate {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        domain: TaskDomain,
        frequency: impl Into<String>,
        default_actions: Vec<TemplateAction>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: title.into(),
            domain,
            frequency: frequency.into(),
            default_actions,
            last_generated: None,
            active: true,
            created_at: Some(Utc::now()),
        }
    }
}

/// Pre-built template definitions for a family household. Returned
/// as (title, domain, frequency, actions) tuples ready to seed.
pub fn default_household_templates() -> Vec<(String, TaskDomain, String, Vec<TemplateAction>)> {
    use ActionType::{Book, Checklist, Delegate, Purchase, Research, Schedule};

    vec![
        (
            "Weekly grocery run".to_string(),
            TaskDomain::Home,
            "weekly".to_string(),
            vec![
                TemplateAction::new(Checklist, "Review meal plan for the week"),
                TemplateAction::new(Checklist, "Check pantry and fridge for staples"),
                TemplateAction::new(Checklist, "Add baby food and toddler snacks"),
                TemplateAction::new(Purchase, "Shop for groceries")
                    .with_metadata(serde_json::json!({"estimated_price": "$100-150"})),
            ],
        ),
        (
            "Diaper & wipes restock check".to_string(),
            TaskDomain::Family,
            "biweekly".to_string(),
            vec![
                TemplateAction::new(Checklist, "Count remaining diaper supply"),
                TemplateAction::new(Checklist, "Check wipes, cream, and bags stock"),
                TemplateAction::new(Purchase, "Order diapers and wipes if running low"),
            ],
        ),
        (
            "Pediatrician well-visit".to_string(),
            TaskDomain::Family,
            "custom".to_string(),
            vec![
                TemplateAction::new(Book, "Schedule pediatrician appointment")
                    .with_metadata(serde_json::json!({"provider_name": "Pediatrician"})),
                TemplateAction::new(Checklist, "Prepare questions and concerns list"),
                TemplateAction::new(Checklist, "Bring vaccination record"),
                TemplateAction::new(Schedule, "Block calendar for appointment")
                    .with_metadata(serde_json::json!({"duration_min": 90})),
            ],
        ),
        (
            "House cleaning".to_string(),
            TaskDomain::Home,
            "weekly".to_string(),
            vec![
                TemplateAction::new(Delegate, "Assign cleaning areas to household members"),
                TemplateAction::new(Checklist, "Kitchen deep clean"),
                TemplateAction::new(Checklist, "Bathrooms"),
                TemplateAction::new(Checklist, "Vacuum and mop floors"),
                TemplateAction::new(Checklist, "Laundry - wash, fold, put away"),
            ],
        ),
        (
            "Weekly meal prep".to_string(),
            TaskDomain::Home,
            "weekly".to_string(),
            vec![
                TemplateAction::new(Research, "Find age-appropriate toddler meal ideas")
                    .with_metadata(serde_json::json!({"query": "easy toddler meals for the week"})),
                TemplateAction::new(Checklist, "Prep and batch cook toddler meals"),
                TemplateAction::new(Checklist, "Portion and label containers"),
                TemplateAction::new(Checklist, "Prep adult lunches for the week"),
            ],
        ),
        (
            "Baby-proofing audit".to_string(),
            TaskDomain::Family,
            "monthly".to_string(),
            vec![
                TemplateAction::new(Checklist, "Check all outlet covers are secure"),
                TemplateAction::new(Checklist, "Test cabinet and drawer locks"),
                TemplateAction::new(Checklist, "Verify baby gates are tight"),
                TemplateAction::new(Checklist, "Move new hazards out of reach"),
                TemplateAction::new(Checklist, "Check smoke and CO detectors"),
            ],
        ),
    ]
}
