//! Result of one query and the events emitted while producing it.

use serde::Serialize;

use crate::history::{History, HistoryEntry};
use crate::llm::LlmUsage;
use crate::tools::ToolInput;

/// Answer returned when the iteration budget runs out.
pub const BUDGET_EXHAUSTED_ANSWER: &str =
    "I apologize, but I couldn't find a satisfactory answer within the allowed iterations.";

/// Answer returned when the run is cancelled between iterations.
pub const CANCELLED_ANSWER: &str = "The request was cancelled before an answer was found.";

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The model gave a final answer.
    Answered,
    /// The iteration budget was used up without an answer.
    BudgetExhausted,
    /// Cancelled from outside between iterations.
    Cancelled,
    /// Stopped at the first error under [`ErrorPolicy::Abort`](super::ErrorPolicy::Abort).
    Aborted,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::BudgetExhausted => "budget_exhausted",
            Self::Cancelled => "cancelled",
            Self::Aborted => "aborted",
        }
    }
}

/// Outcome of [`ReactRunner::process`](super::ReactRunner::process). Always has an answer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReactOutcome {
    pub answer: String,
    pub termination: Termination,
    /// Iterations (model calls attempted) used by this query.
    pub iterations: u32,
    pub history: History,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlmUsage>,
}

impl ReactOutcome {
    pub fn is_answered(&self) -> bool {
        self.termination == Termination::Answered
    }
}

/// Progress of a run, reported to the callback of
/// [`ReactRunner::process_with_events`](super::ReactRunner::process_with_events).
#[derive(Clone, Debug, PartialEq)]
pub enum LoopEvent {
    IterationStarted {
        iteration: u32,
        budget: u32,
    },
    PromptComposed {
        iteration: u32,
        prompt: String,
    },
    ModelResponded {
        iteration: u32,
        content: String,
    },
    ToolRequested {
        iteration: u32,
        tool_name: String,
        input: ToolInput,
        thought: Option<String>,
    },
    EntryAppended {
        iteration: u32,
        entry: HistoryEntry,
    },
    Finished {
        termination: Termination,
        iterations: u32,
    },
}
