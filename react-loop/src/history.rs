//! Append-only record of what one ReAct run produced and observed.
//!
//! Every iteration of [`ReactRunner`](crate::ReactRunner) appends exactly one
//! [`HistoryEntry`]; the whole history is replayed into the next prompt by
//! [`compose_prompt`](crate::compose_prompt), one line per entry, in append order.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Text shown in the prompt when nothing has been observed yet.
pub const NO_OBSERVATIONS: &str = "No previous observations.";

/// One recorded step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// Final answer given by the model.
    AssistantAnswer { text: String },
    /// Structured result returned by a tool.
    ToolObservation {
        tool_name: String,
        result: Map<String, Value>,
    },
    /// A recoverable failure fed back to the model.
    ErrorNote { message: String },
}

impl HistoryEntry {
    pub fn answer(text: impl Into<String>) -> Self {
        Self::AssistantAnswer { text: text.into() }
    }

    pub fn observation(tool_name: impl Into<String>, result: Map<String, Value>) -> Self {
        Self::ToolObservation {
            tool_name: tool_name.into(),
            result,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::ErrorNote {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::ErrorNote { .. })
    }
}

/// Prompt line for the entry.
impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssistantAnswer { text } => write!(f, "Assistant: {}", text),
            Self::ToolObservation { tool_name, result } => {
                let json = serde_json::to_string(result).map_err(|_| fmt::Error)?;
                write!(f, "Tool '{}' returned: {}", tool_name, json)
            }
            Self::ErrorNote { message } => write!(f, "Error: {}", message),
        }
    }
}

/// Ordered history of one query. Only grows; there is no way to remove or reorder entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Renders the history for the prompt; [`NO_OBSERVATIONS`] when empty.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return NO_OBSERVATIONS.to_string();
        }
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
