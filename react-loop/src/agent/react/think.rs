//! Think step: compose the prompt from the current state and ask the model.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::agent::react::act::panic_message;
use crate::agent::react::runner::StepError;
use crate::llm::{LlmClient, LlmResponse};
use crate::prompt::PromptTemplate;
use crate::state::LoopState;
use crate::tools::ToolSpec;

/// Holds the model client, the prompt template and the tool catalog.
pub struct ThinkNode {
    llm: Arc<dyn LlmClient>,
    template: PromptTemplate,
    catalog: Vec<ToolSpec>,
    timeout: Option<Duration>,
}

impl ThinkNode {
    pub fn new(llm: Arc<dyn LlmClient>, catalog: Vec<ToolSpec>) -> Self {
        Self {
            llm,
            template: PromptTemplate::default(),
            catalog,
            timeout: None,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<ToolSpec>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &[ToolSpec] {
        &self.catalog
    }

    /// Prompt for the next iteration: query, full history so far, tool catalog.
    pub fn compose(&self, state: &LoopState) -> String {
        self.template
            .render(&state.query, &state.history, &self.catalog)
    }

    /// One model call, bounded by the configured timeout. A panicking client
    /// becomes [`StepError::ModelPanic`].
    pub async fn call_model(&self, prompt: &str) -> Result<LlmResponse, StepError> {
        let call = AssertUnwindSafe(async { self.llm.invoke(prompt).await }).catch_unwind();
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| StepError::ModelTimeout(limit))?,
            None => call.await,
        };
        match outcome {
            Ok(response) => Ok(response?),
            Err(panic) => Err(StepError::ModelPanic(panic_message(panic.as_ref()))),
        }
    }
}
