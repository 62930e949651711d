//! Recoverable failures of one loop iteration.

use std::time::Duration;

use crate::agent::react::act::DispatchError;
use crate::decision::ParseError;
use crate::llm::LlmError;

/// Everything that can go wrong inside one iteration. The `Display` text is the
/// message of the error note appended to the history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),
    #[error("Model call timed out after {}s", .0.as_secs_f64())]
    ModelTimeout(Duration),
    #[error("Model call panicked: {0}")]
    ModelPanic(String),
}

impl StepError {
    /// Short label for logs and events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse(ParseError::Syntax(_)) => "parse_syntax",
            Self::Parse(ParseError::Schema(_)) => "parse_schema",
            Self::Dispatch(DispatchError::NotFound { .. }) => "tool_not_found",
            Self::Dispatch(DispatchError::Execution { .. }) => "tool_execution",
            Self::Model(_) | Self::ModelTimeout(_) | Self::ModelPanic(_) => "model_call",
        }
    }
}
