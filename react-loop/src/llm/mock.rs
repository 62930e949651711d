//! Scripted model client for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{LlmClient, LlmError, LlmResponse};

/// Replies from a script, one entry per call; the last entry repeats once the
/// script runs out. Every prompt it receives is recorded for inspection.
pub struct MockLlm {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    last: Mutex<Option<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl MockLlm {
    /// Replies with `responses` in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(responses.into_iter().map(|s| Ok(s.into())))
    }

    /// Replies with a script that may include failures.
    pub fn scripted<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Result<String, LlmError>>,
    {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Always replies with `response`.
    pub fn always(response: impl Into<String>) -> Self {
        Self::new([response.into()])
    }

    /// Replies with a final answer: `{"answer": "<text>"}`.
    pub fn answering(text: &str) -> Self {
        Self::always(serde_json::json!({ "answer": text }).to_string())
    }

    /// Sleeps before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }

    fn next_reply(&self) -> Result<String, LlmError> {
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(reply) = next {
            *last = Some(reply);
        }
        last.clone().unwrap_or(Err(LlmError::EmptyResponse))
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_reply().map(LlmResponse::text)
    }
}
