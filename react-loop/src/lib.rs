//! # react-loop
//!
//! A bounded ReAct (reason → act → observe) loop. A language model answers a query
//! by choosing, each iteration, between giving a final answer and calling one of a
//! fixed set of named tools; every tool result is fed back into the next prompt.
//!
//! ## How one query runs
//!
//! 1. [`compose_prompt`] renders the query, the history so far and the tool catalog.
//! 2. The [`LlmClient`] returns raw text.
//! 3. [`parse_decision`] turns it into a [`Decision`]: an answer or a tool action.
//! 4. An action goes through the [`ToolDispatcher`] to the [`ToolRegistry`].
//! 5. The result (or the error) is appended to the [`History`] and the loop repeats,
//!    at most [`ReactOptions::iteration_budget`] times.
//!
//! [`ReactRunner::process`] never fails: malformed model output, unknown tools,
//! tool errors and model failures become error notes in the history and the model
//! gets another try. Running out of iterations yields a normal answer explaining so.
//!
//! ## Main modules
//!
//! - [`agent::react`]: [`ReactRunner`], [`ReactOptions`], [`ThinkNode`], [`ToolDispatcher`].
//! - [`decision`]: [`parse_decision`], [`Decision`], [`ParseError`].
//! - [`history`]: [`History`], [`HistoryEntry`].
//! - [`prompt`]: [`PromptTemplate`], [`compose_prompt`], [`REACT_PROMPT_TEMPLATE`].
//! - [`llm`]: [`LlmClient`], [`MockLlm`], [`ChatGemini`], [`ModelConfig`].
//! - [`tools`]: [`Tool`], [`ToolSpec`], [`ToolRegistry`], demo logistics tools.
//! - [`state`]: [`LoopState`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use react_loop::{register_logistics_tools, MockLlm, ReactOptions, ReactRunner, ToolRegistry};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut tools = ToolRegistry::new();
//! register_logistics_tools(&mut tools);
//!
//! let llm = MockLlm::new([
//!     r#"{"action": {"name": "find_routes", "input": {"origin": "Boston, MA", "destination": "Miami, FL"}}}"#,
//!     r#"{"answer": "Take I-95."}"#,
//! ]);
//! let runner = ReactRunner::new(Arc::new(llm), Arc::new(tools), ReactOptions::default());
//!
//! let outcome = runner.process("Find a route from Boston to Miami").await;
//! println!("{}", outcome.answer);
//! # }
//! ```

pub mod agent;
pub mod decision;
pub mod history;
pub mod llm;
pub mod prompt;
pub mod state;
pub mod tools;

pub use agent::react::{
    DispatchError, ErrorPolicy, LoopEvent, OptionsError, ReactOptions, ReactOptionsBuilder,
    ReactOutcome, ReactRunner, StepError, Termination, ThinkNode, ToolDispatcher,
    BUDGET_EXHAUSTED_ANSWER, CANCELLED_ANSWER, DEFAULT_ITERATION_BUDGET, DEFAULT_MODEL_TIMEOUT,
};
pub use decision::{extract_fenced_block, parse_decision, Decision, ParseError};
pub use history::{History, HistoryEntry, NO_OBSERVATIONS};
pub use llm::{
    ChatGemini, LlmClient, LlmError, LlmResponse, LlmUsage, MockLlm, ModelConfig,
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
};
pub use prompt::{compose_prompt, PromptError, PromptTemplate, REACT_PROMPT_TEMPLATE};
pub use state::LoopState;
pub use tools::{
    register_logistics_tools, Tool, ToolError, ToolInput, ToolOutput, ToolRegistry, ToolSpec,
};

/// When running `cargo test -p react-loop`, initializes tracing from `RUST_LOG` so that
/// unit tests in `src/**` can print logs with `--nocapture`.
#[cfg(test)]
mod test_logging {
    use ctor::ctor;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::Layer;

    #[ctor]
    fn init() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_filter(filter),
            )
            .try_init();
    }
}
