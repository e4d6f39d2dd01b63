//! Oracle provider abstraction.
//!
//! The reasoning oracle is an unreliable, schema-constrained black
//! box: every call carries a bounded timeout and every failure is
//! surfaced as a distinguishable `StewardError` kind so the decision
//! layers can absorb it.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::errors::{StewardError, StewardResult};

/// Message roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleRole {
    System,
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone)]
pub struct OracleMessage {
    pub role: OracleRole,
    pub content: String,
}

impl OracleMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: OracleRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: OracleRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: OracleRole::Assistant,
            content: content.into(),
        }
    }
}

/// Options for a generation call
#[derive(Debug, Clone)]
pub struct OracleOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Hard bound on the request; the oracle call is the engine's only
    /// suspension point and must never block a decision indefinitely.
    pub timeout: Duration,
    /// Ask for a raw JSON object response
    pub json_mode: bool,
}

impl Default for OracleOptions {
    fn default() -> Self {
        Self {
            temperature: Some(0.1),
            max_tokens: Some(4000),
            timeout: Duration::from_secs(20),
            json_mode: true,
        }
    }
}

/// Raw generation output
#[derive(Debug, Clone)]
pub struct OracleResponse {
    pub text: String,
    pub model: String,
    pub provider: String,
}

/// Interface to the external reasoning service
#[async_trait]
pub trait OracleProvider: Send + Sync {
    /// Provider identifier
    fn name(&self) -> &str;

    /// Whether the provider has credentials available
    fn is_configured(&self) -> bool;

    /// Generate a completion for the given messages
    async fn generate_text(
        &self,
        messages: &[OracleMessage],
        options: &OracleOptions,
    ) -> StewardResult<OracleResponse>;
}

/// Parse a structured oracle response into the target schema.
///
/// Distinguishes malformed JSON (`OracleMalformed`) from output that
/// parses but does not match the expected shape (`OracleSchema`).
pub fn parse_oracle_response<T: DeserializeOwned>(response: &OracleResponse) -> StewardResult<T> {
    let cleaned = strip_code_fences(&response.text);

    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(|e| StewardError::OracleMalformed {
            reason: e.to_string(),
        })?;

    serde_json::from_value(value).map_err(|e| StewardError::OracleSchema {
        reason: e.to_string(),
    })
}

/// Remove markdown code fences some models wrap JSON output in.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        value: i32,
    }

    fn response(text: &str) -> OracleResponse {
        OracleResponse {
            text: text.to_string(),
            model: "test".to_string(),
            provider: "test".to_string(),
        }
    }

    #[test]
    fn test_parse_plain_json() {
        let parsed: Sample = parse_oracle_response(&response(r#"{"value": 7}"#)).unwrap();
        assert_eq!(parsed.value, 7);
    }

    #[test]
    fn test_parse_fenced_json() {
        let parsed: Sample =
            parse_oracle_response(&response("```json\n{\"value\": 3}\n```")).unwrap();
        assert_eq!(parsed.value, 3);
    }

    #[test]
    fn test_malformed_json_is_distinguished() {
        let err = parse_oracle_response::<Sample>(&response("{not json")).unwrap_err();
        assert!(matches!(err, StewardError::OracleMalformed { .. }));
    }

    #[test]
    fn test_schema_mismatch_is_distinguished() {
        let err = parse_oracle_response::<Sample>(&response(r#"{"other": true}"#)).unwrap_err();
        assert!(matches!(err, StewardError::OracleSchema { .. }));
    }
}
