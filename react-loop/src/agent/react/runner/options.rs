//! Run options for [`ReactRunner`](super::ReactRunner): iteration budget, timeouts,
//! per-step delay and the error policy.

use std::time::Duration;

pub const DEFAULT_ITERATION_BUDGET: u32 = 10;
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

/// What the loop does after a recoverable error has been recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the error and give the model another iteration.
    #[default]
    Continue,
    /// Record the error and end the query with an answer describing it.
    Abort,
}

impl std::str::FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            _ => Err(format!(
                "unknown error policy: {} (use continue or abort)",
                s
            )),
        }
    }
}

/// Invalid run options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("iteration budget must be at least 1")]
    ZeroBudget,
    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Fixed for the lifetime of a runner; every query uses the same options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactOptions {
    iteration_budget: u32,
    model_timeout: Option<Duration>,
    tool_timeout: Option<Duration>,
    step_delay: Duration,
    error_policy: ErrorPolicy,
}

impl Default for ReactOptions {
    fn default() -> Self {
        Self {
            iteration_budget: DEFAULT_ITERATION_BUDGET,
            model_timeout: Some(DEFAULT_MODEL_TIMEOUT),
            tool_timeout: None,
            step_delay: Duration::ZERO,
            error_policy: ErrorPolicy::Continue,
        }
    }
}

impl ReactOptions {
    pub fn builder() -> ReactOptionsBuilder {
        ReactOptionsBuilder::default()
    }

    /// Maximum number of iterations (model calls) per query.
    pub fn iteration_budget(&self) -> u32 {
        self.iteration_budget
    }

    pub fn model_timeout(&self) -> Option<Duration> {
        self.model_timeout
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout
    }

    /// Pause before each model call and each tool call.
    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }
}

/// Builder for [`ReactOptions`]; [`build`](Self::build) validates.
#[derive(Clone, Debug, Default)]
pub struct ReactOptionsBuilder {
    options: ReactOptions,
}

impl ReactOptionsBuilder {
    pub fn iteration_budget(mut self, budget: u32) -> Self {
        self.options.iteration_budget = budget;
        self
    }

    /// `None` waits for the model indefinitely.
    pub fn model_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.model_timeout = timeout;
        self
    }

    pub fn tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.tool_timeout = timeout;
        self
    }

    pub fn step_delay(mut self, delay: Duration) -> Self {
        self.options.step_delay = delay;
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.options.error_policy = policy;
        self
    }

    pub fn build(self) -> Result<ReactOptions, OptionsError> {
        let o = self.options;
        if o.iteration_budget == 0 {
            return Err(OptionsError::ZeroBudget);
        }
        if o.model_timeout == Some(Duration::ZERO) {
            return Err(OptionsError::ZeroTimeout("model"));
        }
        if o.tool_timeout == Some(Duration::ZERO) {
            return Err(OptionsError::ZeroTimeout("tool"));
        }
        Ok(o)
    }
}
