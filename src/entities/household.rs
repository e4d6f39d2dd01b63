//! Household member entity, used as a lookup table by the
//! delegation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person (or external helper) that task actions can be delegated to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdMember {
    /// Unique identifier
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Display name, referenced by `TaskAction::assigned_to`
    pub name: String,

    /// Role within the household (parent, nanny, cleaner, ...)
    #[serde(default = "default_role")]
    pub role: String,

    /// Free-text skill tags matched by the delegation engine
    #[serde(default)]
    pub skills: Vec<String>,

    /// Phone number or email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    /// Whether this is paid outside help rather than family
    #[serde(default)]
    pub is_external: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_role() -> String {
    "parent".to_string()
}

impl HouseholdMember {
    /// Create a new member with the given skills
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
        skills: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            role: default_role(),
            skills,
            contact: None,
            is_external: false,
            created_at: Some(Utc::now()),
        }
    }

    /// Case-insensitive skill check
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_skill_case_insensitive() {
        let member = HouseholdMember::new("m1", "u1", "Alex", vec!["Errands".to_string()]);
        assert!(member.has_skill("errands"));
        assert!(member.has_skill("ERRANDS"));
        assert!(!member.has_skill("cooking"));
    }
}
