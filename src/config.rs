//! Engine configuration.
//!
//! The scoring weights and the skill lookup tables are immutable maps
//! handed to the engine at construction, so tests can run synthetic
//! rosters without touching the shipped defaults.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entities::{ActionType, TaskDomain};

/// Fixed weights of the priority score terms
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub urgency: f64,
    pub importance: f64,
    pub effort_inverse: f64,
    pub domain_weight: f64,
    pub context_fit: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            urgency: 0.30,
            importance: 0.40,
            effort_inverse: 0.10,
            domain_weight: 0.15,
            context_fit: 0.05,
        }
    }
}

/// Scoring configuration: term weights plus per-domain constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,

    /// Weight applied to each life area
    pub domain_weights: HashMap<TaskDomain, f64>,

    /// Weight for a domain missing from the table
    pub default_domain_weight: f64,
}

impl ScoringConfig {
    /// Weight for the given domain, falling back to the default
    pub fn domain_weight(&self, domain: TaskDomain) -> f64 {
        self.domain_weights
            .get(&domain)
            .copied()
            .unwrap_or(self.default_domain_weight)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let domain_weights = HashMap::from([
            (TaskDomain::Family, 1.0),
            (TaskDomain::Job, 0.9),
            (TaskDomain::Company, 0.9),
            (TaskDomain::Home, 0.8),
            (TaskDomain::Personal, 0.7),
        ]);

        Self {
            weights: ScoreWeights::default(),
            domain_weights,
            default_domain_weight: 0.8,
        }
    }
}

/// Skill tables used by the delegation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTables {
    /// Skills implied by a task's life area
    pub domain_skills: HashMap<TaskDomain, Vec<String>>,

    /// Skills implied by an action's type
    pub action_skills: HashMap<ActionType, Vec<String>>,
}

impl SkillTables {
    pub fn skills_for_domain(&self, domain: TaskDomain) -> &[String] {
        self.domain_skills.get(&domain).map_or(&[], Vec::as_slice)
    }

    pub fn skills_for_action(&self, action_type: ActionType) -> &[String] {
        self.action_skills
            .get(&action_type)
            .map_or(&[], Vec::as_slice)
    }
}

fn skills(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

impl Default for SkillTables {
    fn default() -> Self {
        let domain_skills = HashMap::from([
            (TaskDomain::Family, skills(&["childcare", "medical", "cooking"])),
            (
                TaskDomain::Home,
                skills(&["handyman", "cleaning", "cooking", "errands"]),
            ),
            (TaskDomain::Job, skills(&["tech", "admin"])),
            (TaskDomain::Company, skills(&["tech", "admin", "finance"])),
            (TaskDomain::Personal, skills(&["errands"])),
        ]);

        let action_skills = HashMap::from([
            (ActionType::Purchase, skills(&["errands", "shopping"])),
            (ActionType::Call, skills(&["admin", "medical"])),
            (ActionType::Book, skills(&["admin", "medical"])),
            (ActionType::Schedule, Vec::new()),
            (ActionType::Research, skills(&["tech"])),
        ]);

        Self {
            domain_skills,
            action_skills,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,

    pub skills: SkillTables,

    /// Bound applied to every oracle call
    pub oracle_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            skills: SkillTables::default(),
            oracle_timeout: Duration::from_secs(20),
        }
    }
}
