//! OpenAI-compatible API client.

use super::{ChatMessage, ChatRequest, ChatResponse};
use adforge_core::{CompletionRequest, CompletionResponse};
use adforge_error::{AdforgeResult, ProviderError, ProviderErrorKind};
use adforge_interface::CreativeDriver;
use derive_getters::Getters;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MAX_RETRIES: usize = 3;
const RETRY_BASE_DELAY_MS: u64 = 500;
const RETRY_MAX_DELAY_SECS: u64 = 10;

/// Configuration for the OpenAI-compatible client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(pattern = "owned")]
pub struct OpenAiConfig {
    /// API key
    api_key: String,
    /// Default model identifier
    model: String,
    /// API base URL (override for compatible providers)
    #[serde(default = "default_base_url")]
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    #[builder(default = "DEFAULT_TIMEOUT_MS")]
    timeout_ms: u64,
    /// Transient-failure retry ceiling (attempts beyond the first call)
    #[serde(default = "default_max_retries")]
    #[builder(default = "DEFAULT_MAX_RETRIES")]
    max_retries: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_retries() -> usize {
    DEFAULT_MAX_RETRIES
}

impl OpenAiConfig {
    /// Creates a new config builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }
}

/// OpenAI-compatible chat-completions client.
///
/// Each call is wrapped with a request-level timeout so one hung upstream
/// call cannot block a generation job indefinitely; transient failures
/// (timeouts, rate limits, 5xx) are retried with exponential backoff and
/// jitter before the error propagates.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: OpenAiConfig) -> AdforgeResult<Self> {
        debug!(model = %config.model(), "Creating new OpenAI client");
        let client = Client::builder()
            .timeout(Duration::from_millis(*config.timeout_ms()))
            .build()
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::Http(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self { client, config })
    }

    /// Sends one chat request without retry handling.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.config.base_url());

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(timeout_ms = self.config.timeout_ms(), "Provider request timed out");
                    ProviderError::new(ProviderErrorKind::Timeout(*self.config.timeout_ms()))
                } else {
                    error!(error = ?e, "Failed to send request to provider");
                    ProviderError::new(ProviderErrorKind::Http(format!("Request failed: {}", e)))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Provider returned error");
            if status.as_u16() == 429 {
                return Err(ProviderError::new(ProviderErrorKind::RateLimited(body)));
            }
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message: body,
            }));
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse provider response");
            ProviderError::new(ProviderErrorKind::Parse(format!(
                "Failed to parse response: {}",
                e
            )))
        })
    }

    /// Converts a CompletionRequest to a chat-completions request body.
    fn convert_request(&self, request: &CompletionRequest) -> Result<ChatRequest, ProviderError> {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(request.prompt.clone()));

        let response_format = request.response_schema.as_ref().map(|schema| {
            serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "adforge_output",
                    "schema": schema,
                    "strict": true
                }
            })
        });

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.model().clone());

        ChatRequest::builder()
            .model(model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .response_format(response_format)
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Parse(e.to_string())))
    }

    /// Extracts the generated text from a chat response.
    fn extract_text(response: ChatResponse) -> Result<String, ProviderError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::Parse(
                    "Response contained no text content".to_string(),
                ))
            })
    }
}

#[async_trait::async_trait]
impl CreativeDriver for OpenAiClient {
    #[instrument(skip(self, req), fields(model = ?req.model, provider = self.provider_name()))]
    async fn complete(&self, req: &CompletionRequest) -> AdforgeResult<CompletionResponse> {
        use tokio_retry2::{strategy::jitter, strategy::ExponentialBackoff, Retry, RetryError};

        let chat_request = self.convert_request(req)?;

        let retry_strategy = ExponentialBackoff::from_millis(RETRY_BASE_DELAY_MS)
            .factor(2)
            .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
            .map(jitter)
            .take(*self.config.max_retries());

        let response = Retry::spawn(retry_strategy, || {
            let request = chat_request.clone();
            async move {
                match self.send_chat(&request).await {
                    Ok(response) => Ok(response),
                    Err(e) if e.is_retryable() => {
                        warn!(error = %e, "Transient provider failure, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(error = %e, "Permanent provider failure, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await?;

        let text = Self::extract_text(response)?;
        debug!(text_len = text.len(), "Received provider completion");
        Ok(CompletionResponse::new(text))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiClient {
        OpenAiClient::new(
            OpenAiConfig::builder()
                .api_key("test-key".to_string())
                .model("gpt-4o-mini".to_string())
                .build()
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn convert_request_places_system_first() {
        let request = CompletionRequest::builder()
            .system(Some("You grade ads.".to_string()))
            .prompt("Grade this batch.".to_string())
            .build()
            .unwrap();

        let chat = client().convert_request(&request).unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.messages[1].role, "user");
        assert!(chat.response_format.is_none());
    }

    #[test]
    fn schema_hint_becomes_response_format() {
        let request = CompletionRequest::builder()
            .prompt("Return JSON.".to_string())
            .response_schema(Some(serde_json::json!({"type": "object"})))
            .build()
            .unwrap();

        let chat = client().convert_request(&request).unwrap();
        let format = chat.response_format.unwrap();
        assert_eq!(format["type"], "json_schema");
    }

    #[test]
    fn extract_text_requires_content() {
        let empty = ChatResponse { choices: vec![] };
        assert!(OpenAiClient::extract_text(empty).is_err());
    }
}
