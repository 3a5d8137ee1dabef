//! OpenAI-compatible chat-completions provider.

mod client;
mod dto;

pub use client::{OpenAiClient, OpenAiConfig, OpenAiConfigBuilder};
pub(crate) use dto::{ChatMessage, ChatRequest, ChatResponse};
