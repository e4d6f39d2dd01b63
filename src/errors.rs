//! Error types for the steward crate.

use thiserror::Error;

/// Comprehensive error types for the assistant engine
#[derive(Error, Debug, Clone)]
pub enum StewardError {
    // Lookup errors
    #[error("Task '{task_id}' not found")]
    TaskNotFound { task_id: String },

    #[error("Action '{action_id}' not found")]
    ActionNotFound { action_id: String },

    #[error("Household member '{member_id}' not found")]
    MemberNotFound { member_id: String },

    #[error("Recurring template '{template_id}' not found")]
    TemplateNotFound { template_id: String },

    // Validation errors
    #[error("Invalid status: '{status}'")]
    InvalidStatus { status: String },

    #[error("Invalid priority: '{priority}'")]
    InvalidPriority { priority: String },

    #[error("Invalid domain: '{domain}'")]
    InvalidDomain { domain: String },

    #[error("Invalid action type: '{action_type}'")]
    InvalidActionType { action_type: String },

    #[error("Invalid nudge type: '{nudge_type}'")]
    InvalidNudgeType { nudge_type: String },

    #[error("Invalid status transition for task '{task_id}': {from} -> {to}")]
    InvalidTransition {
        task_id: String,
        from: String,
        to: String,
    },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // Oracle errors: always absorbed by the decision layers, never
    // surfaced as the primary outcome of an engine call.
    #[error("Oracle provider not configured: {provider}")]
    OracleNotConfigured { provider: String },

    #[error("Oracle request failed: {reason}")]
    OracleTransport { reason: String },

    #[error("Oracle request timed out")]
    OracleTimeout,

    #[error("Oracle returned malformed JSON: {reason}")]
    OracleMalformed { reason: String },

    #[error("Oracle response did not match the expected schema: {reason}")]
    OracleSchema { reason: String },

    // Storage errors
    #[error("Storage error: {reason}")]
    Storage { reason: String },

    #[error("Failed to read file '{path}': {reason}")]
    FileRead { path: String, reason: String },

    #[error("Failed to write file '{path}': {reason}")]
    FileWrite { path: String, reason: String },

    #[error("Failed to parse JSON: {reason}")]
    Json { reason: String },

    #[error("Store not initialized. Run 'steward init' first.")]
    NotInitialized,

    // Prompt errors
    #[error("Prompt template error: {reason}")]
    Template { reason: String },

    // General errors
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl StewardError {
    /// Whether this error originated at the oracle boundary. Oracle
    /// failures must be recovered via the deterministic fallbacks.
    pub fn is_oracle(&self) -> bool {
        matches!(
            self,
            Self::OracleNotConfigured { .. }
                | Self::OracleTransport { .. }
                | Self::OracleTimeout
                | Self::OracleMalformed { .. }
                | Self::OracleSchema { .. }
        )
    }
}

impl From<std::io::Error> for StewardError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StewardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for steward operations
pub type StewardResult<T> = Result<T, StewardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StewardError::TaskNotFound {
            task_id: "123".to_string(),
        };
        assert_eq!(err.to_string(), "Task '123' not found");
    }

    #[test]
    fn test_oracle_errors_are_classified() {
        assert!(StewardError::OracleTimeout.is_oracle());
        assert!(StewardError::OracleMalformed {
            reason: "unexpected EOF".to_string()
        }
        .is_oracle());
        assert!(!StewardError::TaskNotFound {
            task_id: "1".to_string()
        }
        .is_oracle());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StewardError = io_err.into();
        assert!(matches!(err, StewardError::Storage { .. }));
    }
}
