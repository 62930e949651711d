//! Per-query state owned by one run of the ReAct loop.
//!
//! [`LoopState`] is created fresh by [`ReactRunner::process`](crate::ReactRunner::process)
//! for every query and dropped (or returned inside [`ReactOutcome`](crate::ReactOutcome))
//! when the run ends. Nothing carries over between queries.

use crate::history::{History, HistoryEntry};
use crate::llm::LlmUsage;

/// Query, history, iteration counter and accumulated token usage of one run.
#[derive(Debug, Clone, Default)]
pub struct LoopState {
    pub query: String,
    pub history: History,
    /// Iterations started so far.
    pub iteration: u32,
    pub usage: Option<LlmUsage>,
}

impl LoopState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Appends one entry; the only way the history changes.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    pub fn add_usage(&mut self, usage: Option<&LlmUsage>) {
        if let Some(u) = usage {
            self.usage.get_or_insert_with(LlmUsage::default).accumulate(u);
        }
    }
}
