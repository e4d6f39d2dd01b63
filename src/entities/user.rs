//! User profile entity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The single user this engine plans for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,

    pub name: String,

    pub email: String,

    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Free-form preferences passed through to the oracle prompts
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub preferences: HashMap<String, serde_json::Value>,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

impl UserProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            time_zone: default_time_zone(),
            preferences: HashMap::new(),
        }
    }
}
