//! ReAct loop controller: options, outcome, errors and the runner itself.

mod error;
mod options;
mod outcome;
mod runner;

pub use error::StepError;
pub use options::{
    ErrorPolicy, OptionsError, ReactOptions, ReactOptionsBuilder, DEFAULT_ITERATION_BUDGET,
    DEFAULT_MODEL_TIMEOUT,
};
pub use outcome::{
    LoopEvent, ReactOutcome, Termination, BUDGET_EXHAUSTED_ANSWER, CANCELLED_ANSWER,
};
pub use runner::ReactRunner;
