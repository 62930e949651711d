//! ReactRunner: the bounded think → act → observe loop.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::agent::react::act::ToolDispatcher;
use crate::agent::react::think::ThinkNode;
use crate::decision::{parse_decision, Decision};
use crate::history::HistoryEntry;
use crate::llm::LlmClient;
use crate::prompt::PromptTemplate;
use crate::state::LoopState;
use crate::tools::{ToolRegistry, ToolSpec};

use super::error::StepError;
use super::options::{ErrorPolicy, ReactOptions};
use super::outcome::{
    LoopEvent, ReactOutcome, Termination, BUDGET_EXHAUSTED_ANSWER, CANCELLED_ANSWER,
};

/// Result of one iteration that did not fail.
enum Step {
    Answered(String),
    Observed,
}

/// Answers queries by looping model → parse → tool until an answer or the budget.
///
/// Each [`process`](Self::process) call starts from an empty history and never
/// returns an error: model failures, malformed output and tool failures are
/// recorded as error notes and the model gets another iteration.
pub struct ReactRunner {
    think: ThinkNode,
    act: ToolDispatcher,
    options: ReactOptions,
}

impl ReactRunner {
    /// The tool catalog defaults to the registry's specs.
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, options: ReactOptions) -> Self {
        let think = ThinkNode::new(llm, tools.specs()).with_timeout(options.model_timeout());
        let act = ToolDispatcher::new(tools).with_timeout(options.tool_timeout());
        Self {
            think,
            act,
            options,
        }
    }

    /// Replaces the catalog shown to the model (dispatch still uses the registry).
    pub fn with_catalog(mut self, catalog: Vec<ToolSpec>) -> Self {
        self.think = self.think.with_catalog(catalog);
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.think = self.think.with_template(template);
        self
    }

    pub fn options(&self) -> &ReactOptions {
        &self.options
    }

    pub fn catalog(&self) -> &[ToolSpec] {
        self.think.catalog()
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.act.registry()
    }

    /// Answers `query`. Always returns an outcome with an answer.
    pub async fn process(&self, query: &str) -> ReactOutcome {
        self.run(query, None, |_| {}).await
    }

    /// Like [`process`](Self::process), reporting progress to `on_event`.
    pub async fn process_with_events<F>(&self, query: &str, on_event: F) -> ReactOutcome
    where
        F: FnMut(LoopEvent),
    {
        self.run(query, None, on_event).await
    }

    /// Like [`process_with_events`](Self::process_with_events); stops before the
    /// next iteration once `cancel` is triggered.
    pub async fn process_cancellable<F>(
        &self,
        query: &str,
        cancel: &CancellationToken,
        on_event: F,
    ) -> ReactOutcome
    where
        F: FnMut(LoopEvent),
    {
        self.run(query, Some(cancel), on_event).await
    }

    async fn run<F>(
        &self,
        query: &str,
        cancel: Option<&CancellationToken>,
        mut on_event: F,
    ) -> ReactOutcome
    where
        F: FnMut(LoopEvent),
    {
        let budget = self.options.iteration_budget();
        let span = tracing::info_span!("react", budget, query_len = query.len());
        async move {
            let mut state = LoopState::new(query);
            tracing::info!("run started");
            loop {
                if cancel.is_some_and(CancellationToken::is_cancelled) {
                    tracing::info!(iterations = state.iteration, "run cancelled");
                    return finish(state, Termination::Cancelled, CANCELLED_ANSWER, &mut on_event);
                }
                if state.iteration >= budget {
                    tracing::warn!(iterations = state.iteration, "iteration budget exhausted");
                    return finish(
                        state,
                        Termination::BudgetExhausted,
                        BUDGET_EXHAUSTED_ANSWER,
                        &mut on_event,
                    );
                }
                state.iteration += 1;
                let iteration = state.iteration;
                tracing::debug!(iteration, "iteration started");
                on_event(LoopEvent::IterationStarted { iteration, budget });

                match self.step(&mut state, &mut on_event).await {
                    Ok(Step::Answered(answer)) => {
                        tracing::info!(iteration, "final answer");
                        return finish(state, Termination::Answered, &answer, &mut on_event);
                    }
                    Ok(Step::Observed) => {}
                    Err(e) => {
                        tracing::warn!(iteration, kind = e.kind(), error = %e, "step failed");
                        let message = e.to_string();
                        append(&mut state, HistoryEntry::error(message.clone()), &mut on_event);
                        if self.options.error_policy() == ErrorPolicy::Abort {
                            let answer = format!("I had to stop because of an error: {}", message);
                            return finish(state, Termination::Aborted, &answer, &mut on_event);
                        }
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// One iteration. Appends exactly one entry on `Ok`; on `Err` the caller appends the note.
    async fn step<F>(&self, state: &mut LoopState, on_event: &mut F) -> Result<Step, StepError>
    where
        F: FnMut(LoopEvent),
    {
        let iteration = state.iteration;
        let prompt = self.think.compose(state);
        tracing::debug!(iteration, prompt = %prompt, "prompt composed");
        on_event(LoopEvent::PromptComposed {
            iteration,
            prompt: prompt.clone(),
        });

        self.pause().await;
        let response = self.think.call_model(&prompt).await?;
        state.add_usage(response.usage.as_ref());
        tracing::debug!(iteration, response = %response.content, "model responded");
        on_event(LoopEvent::ModelResponded {
            iteration,
            content: response.content.clone(),
        });

        match parse_decision(&response.content)? {
            Decision::Answer { text, .. } => {
                append(state, HistoryEntry::answer(text.clone()), on_event);
                Ok(Step::Answered(text))
            }
            Decision::Action {
                tool_name,
                input,
                thought,
            } => {
                tracing::info!(iteration, tool = %tool_name, "tool requested");
                on_event(LoopEvent::ToolRequested {
                    iteration,
                    tool_name: tool_name.clone(),
                    input: input.clone(),
                    thought,
                });
                self.pause().await;
                let entry = self.act.dispatch(&tool_name, input).await?;
                append(state, entry, on_event);
                Ok(Step::Observed)
            }
        }
    }

    async fn pause(&self) {
        let delay = self.options.step_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

fn append<F>(state: &mut LoopState, entry: HistoryEntry, on_event: &mut F)
where
    F: FnMut(LoopEvent),
{
    state.record(entry.clone());
    on_event(LoopEvent::EntryAppended {
        iteration: state.iteration,
        entry,
    });
}

fn finish<F>(state: LoopState, termination: Termination, answer: &str, on_event: &mut F) -> ReactOutcome
where
    F: FnMut(LoopEvent),
{
    on_event(LoopEvent::Finished {
        termination,
        iterations: state.iteration,
    });
    ReactOutcome {
        answer: answer.to_string(),
        termination,
        iterations: state.iteration,
        history: state.history,
        usage: state.usage,
    }
}
