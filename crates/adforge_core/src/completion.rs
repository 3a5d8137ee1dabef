//! Request and response types for AI provider completions.

use serde::{Deserialize, Serialize};

/// A single-shot completion request sent to an AI provider.
///
/// The optional `response_schema` is a hint for providers that support
/// constrained decoding; the pipeline works even when the provider ignores
/// it, which is why every response still passes through schema validation.
///
/// # Examples
///
/// ```
/// use adforge_core::CompletionRequest;
///
/// let request = CompletionRequest::builder()
///     .prompt("Return the JSON batch.".to_string())
///     .temperature(Some(0.7))
///     .build()
///     .unwrap();
///
/// assert!(request.system.is_none());
/// assert_eq!(request.temperature, Some(0.7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder)]
#[builder(default)]
pub struct CompletionRequest {
    /// System instruction, if any
    pub system: Option<String>,
    /// The user prompt
    pub prompt: String,
    /// Model identifier override
    pub model: Option<String>,
    /// Sampling temperature (0.0 to 1.0)
    pub temperature: Option<f32>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Optional JSON schema hint for constrained decoding
    pub response_schema: Option<serde_json::Value>,
}

impl CompletionRequest {
    /// Creates a new completion request builder.
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }

    /// A plain prompt-only request.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// The raw text returned by an AI provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text
    pub text: String,
}

impl CompletionResponse {
    /// Wrap raw provider text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
