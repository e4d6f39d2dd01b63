//! OpenAI chat-completions oracle provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{StewardError, StewardResult};

use super::provider::{OracleMessage, OracleOptions, OracleProvider, OracleResponse, OracleRole};

/// OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model
const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

/// OpenAI API request message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI API request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// OpenAI API response choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI API response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    model: String,
}

/// OpenAI API error
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

/// OpenAI chat-completions provider.
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    /// Create a new provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: Some(api_key.into()),
            base_url: OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from the OPENAI_API_KEY environment variable. The
    /// provider stays unconfigured when the variable is absent; the
    /// decision layers then run on their deterministic fallbacks.
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model id.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn convert_messages(messages: &[OracleMessage]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|msg| ChatMessage {
                role: match msg.role {
                    OracleRole::System => "system".to_string(),
                    OracleRole::User => "user".to_string(),
                    OracleRole::Assistant => "assistant".to_string(),
                },
                content: msg.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl OracleProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_text(
        &self,
        messages: &[OracleMessage],
        options: &OracleOptions,
    ) -> StewardResult<OracleResponse> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| StewardError::OracleNotConfigured {
                provider: "openai".to_string(),
            })?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.json_mode.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .timeout(options.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StewardError::OracleTimeout
                } else {
                    StewardError::OracleTransport {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StewardError::OracleTransport {
                reason: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(StewardError::OracleTransport {
                    reason: format!(
                        "OpenAI API error ({}): {}",
                        error_response.error.error_type.unwrap_or_default(),
                        error_response.error.message
                    ),
                });
            }
            return Err(StewardError::OracleTransport {
                reason: format!("OpenAI API error ({status}): {body}"),
            });
        }

        let api_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| StewardError::OracleMalformed {
                reason: format!("failed to parse API response: {e}"),
            })?;

        let text = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();

        Ok(OracleResponse {
            text,
            model: api_response.model,
            provider: "openai".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let provider = OpenAiProvider::new("key");
        assert_eq!(provider.name(), "openai");
        assert!(provider.is_configured());
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![
            OracleMessage::system("You are a planner"),
            OracleMessage::user("Plan my day"),
        ];

        let converted = OpenAiProvider::convert_messages(&messages);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
    }

    #[tokio::test]
    async fn test_unconfigured_provider_errors() {
        let provider = OpenAiProvider {
            client: Client::new(),
            api_key: None,
            base_url: OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        };

        let err = provider
            .generate_text(&[OracleMessage::user("hi")], &OracleOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StewardError::OracleNotConfigured { .. }));
    }
}
