//! Structured response schemas the oracle is constrained to.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::ActionType;

/// One ranked recommendation as returned by the oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleRecommendation {
    pub task_id: String,
    pub reason: String,
    #[serde(default)]
    pub estimated_time_min: Option<u32>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// What-now oracle output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatNowOutput {
    pub recommendations: Vec<OracleRecommendation>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub context_summary: String,
}

/// One generated action step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub label: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Workflow decomposition oracle output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutput {
    pub actions: Vec<GeneratedAction>,
    #[serde(default)]
    pub reasoning: String,
}

/// One planned slot in the daily plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlanItem {
    pub task_id: String,
    pub task_title: String,
    /// ISO time string
    pub suggested_time: String,
    pub reason: String,
    #[serde(default = "default_duration")]
    pub estimated_duration_min: u32,
}

fn default_duration() -> u32 {
    30
}

/// Daily plan oracle output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlanOutput {
    pub plan: Vec<DailyPlanItem>,
    #[serde(default)]
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_output_parses_action_types() {
        let json = r#"{
            "actions": [
                {"type": "research", "label": "Compare car seats"},
                {"type": "purchase", "label": "Buy the chosen seat", "assigned_to": "Alex"}
            ],
            "reasoning": "research before purchase"
        }"#;

        let output: WorkflowOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.actions.len(), 2);
        assert_eq!(output.actions[0].action_type, ActionType::Research);
        assert_eq!(output.actions[1].assigned_to.as_deref(), Some("Alex"));
    }

    #[test]
    fn test_unknown_action_type_is_rejected() {
        let json = r#"{"actions": [{"type": "levitate", "label": "x"}]}"#;
        assert!(serde_json::from_str::<WorkflowOutput>(json).is_err());
    }

    #[test]
    fn test_plan_item_duration_defaults() {
        let json = r#"{
            "plan": [{
                "task_id": "1",
                "task_title": "t",
                "suggested_time": "2025-06-15T09:00:00",
                "reason": "r"
            }],
            "summary": "s"
        }"#;

        let output: DailyPlanOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.plan[0].estimated_duration_min, 30);
    }
}
