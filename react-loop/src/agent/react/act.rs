//! Tool dispatcher: resolves the requested tool and runs it once.
//!
//! Unknown names, tool errors, timeouts and panics all come back as a
//! [`DispatchError`]; nothing a tool does escapes the dispatcher.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::history::HistoryEntry;
use crate::tools::{ToolInput, ToolRegistry};

/// Why a requested tool produced no observation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The model asked for a name that is not registered.
    #[error("Tool '{name}' is not available. Please use only: {}", .available.join(", "))]
    NotFound { name: String, available: Vec<String> },
    /// The tool failed, timed out or panicked.
    #[error("Error executing tool '{name}': {cause}")]
    Execution { name: String, cause: String },
}

impl DispatchError {
    pub fn tool_name(&self) -> &str {
        match self {
            Self::NotFound { name, .. } | Self::Execution { name, .. } => name,
        }
    }
}

/// Runs tools from a [`ToolRegistry`], one call at a time.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Option<Duration>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: None,
        }
    }

    /// Bounds each tool call; expiry is an [`DispatchError::Execution`].
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Invokes `name` with `input` and awaits it to completion.
    pub async fn dispatch(
        &self,
        name: &str,
        input: ToolInput,
    ) -> Result<HistoryEntry, DispatchError> {
        let Some(tool) = self.registry.get(name) else {
            return Err(DispatchError::NotFound {
                name: name.to_string(),
                available: self.registry.names(),
            });
        };

        let call = AssertUnwindSafe(tool.call(input)).catch_unwind();
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    return Err(DispatchError::Execution {
                        name: name.to_string(),
                        cause: format!("timed out after {:?}", limit),
                    });
                }
            },
            None => call.await,
        };

        match outcome {
            Ok(Ok(result)) => Ok(HistoryEntry::observation(name, result)),
            Ok(Err(e)) => Err(DispatchError::Execution {
                name: name.to_string(),
                cause: e.to_string(),
            }),
            Err(panic) => Err(DispatchError::Execution {
                name: name.to_string(),
                cause: format!("tool panicked: {}", panic_message(panic.as_ref())),
            }),
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
