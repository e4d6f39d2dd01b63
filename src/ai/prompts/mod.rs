//! Prompt template system for oracle operations.
//!
//! Handlebars-based system/user prompt pairs with typed, serializable
//! context structs per operation.

use std::collections::HashMap;

use handlebars::Handlebars;
use serde::Serialize;

use crate::errors::{StewardError, StewardResult};

mod daily_plan;
mod decompose_task;
mod what_now;

pub use daily_plan::DailyPlanContext;
pub use decompose_task::{DecomposeTaskContext, MemberSummary};
pub use what_now::{CandidateSummary, WhatNowContext};

/// A prompt template with system and user messages.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Template ID
    pub id: String,
    /// Description
    pub description: String,
    /// System prompt template
    pub system: String,
    /// User prompt template
    pub user: String,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(id: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            system: system.into(),
            user: user.into(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render the template with the given context.
    pub fn render<T: Serialize>(&self, context: &T) -> StewardResult<(String, String)> {
        let mut handlebars = Handlebars::new();

        // Prompts are plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string("system", &self.system)
            .map_err(|e| StewardError::Template {
                reason: format!("invalid system template: {e}"),
            })?;

        handlebars
            .register_template_string("user", &self.user)
            .map_err(|e| StewardError::Template {
                reason: format!("invalid user template: {e}"),
            })?;

        let system = handlebars
            .render("system", context)
            .map_err(|e| StewardError::Template {
                reason: format!("failed to render system prompt: {e}"),
            })?;

        let user = handlebars
            .render("user", context)
            .map_err(|e| StewardError::Template {
                reason: format!("failed to render user prompt: {e}"),
            })?;

        Ok((system, user))
    }
}

/// Registry of the built-in prompt templates.
#[derive(Debug, Clone)]
pub struct PromptManager {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptManager {
    /// Get a template by id.
    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.get(id)
    }

    /// All registered template ids.
    pub fn ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}

impl Default for PromptManager {
    fn default() -> Self {
        let mut templates = HashMap::new();
        for template in [
            what_now::template(),
            decompose_task::template(),
            daily_plan::template(),
        ] {
            templates.insert(template.id.clone(), template);
        }
        Self { templates }
    }
}
