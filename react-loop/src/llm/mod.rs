//! Model client abstraction used by the ReAct loop.
//!
//! The loop hands the client one fully composed prompt per iteration and gets raw
//! text back; parsing that text is the loop's job, not the client's. This module
//! defines the trait, a scripted mock for tests and demos, and a Gemini client.

mod gemini;
mod mock;

pub use gemini::{ChatGemini, ModelConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
pub use mock::MockLlm;

use async_trait::async_trait;

/// Token usage for one model call (prompt + completion).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    /// Tokens in the prompt (input).
    pub prompt_tokens: u32,
    /// Tokens in the completion (output).
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Adds `other` into `self`, saturating at `u32::MAX`.
    pub fn accumulate(&mut self, other: &LlmUsage) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(other.prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(other.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}

/// Raw model output for one prompt.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LlmResponse {
    /// Response text, unparsed.
    pub content: String,
    /// Token usage, when the provider reports it.
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

/// Why a model call produced no usable text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rate limited by provider: {0}")]
    RateLimited(String),
    #[error("provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("malformed provider response: {0}")]
    Malformed(String),
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),
}

/// Model client: prompt in, raw text out.
///
/// Called exactly once per loop iteration and awaited to completion. Every
/// failure is returned as [`LlmError`]; the loop records it and tries again.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<LlmResponse, LlmError>;
}
