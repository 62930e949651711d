//! ReAct: think (compose + model call), parse, act (tool dispatch), observe
//! (append to history), repeated until an answer or the iteration budget.
//!
//! # Main types
//!
//! - **[`ReactRunner`]**: The loop controller; [`ReactRunner::process`] is the entry point.
//! - **[`ThinkNode`]**: Renders the prompt and calls the model.
//! - **[`ToolDispatcher`]**: Resolves and runs the requested tool.
//! - **[`ReactOptions`]**: Iteration budget, timeouts, step delay, [`ErrorPolicy`].

mod act;
mod runner;
mod think;

pub use act::{DispatchError, ToolDispatcher};
pub use runner::{
    ErrorPolicy, LoopEvent, OptionsError, ReactOptions, ReactOptionsBuilder, ReactOutcome,
    ReactRunner, StepError, Termination, BUDGET_EXHAUSTED_ANSWER, CANCELLED_ANSWER,
    DEFAULT_ITERATION_BUDGET, DEFAULT_MODEL_TIMEOUT,
};
pub use think::ThinkNode;
