//! End-to-end tests for ReactRunner: scripted model, small in-test tools.
//!
//! Each test scripts the model's raw replies with MockLlm and asserts on the
//! outcome, the history and the prompts the model actually received.


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use react_loop::{
    compose_prompt, ErrorPolicy, History, HistoryEntry, LlmClient, LlmError, LlmResponse,
    LoopEvent, MockLlm, ReactOptions, ReactRunner, Termination, Tool, ToolError, ToolInput, ToolOutput,
    ToolRegistry, ToolSpec, BUDGET_EXHAUSTED_ANSWER, CANCELLED_ANSWER,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// Looks up `key` and counts its calls.
struct LookupTool {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Tool for LookupTool {
    fn name(&self) -> &str {
        "lookup"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "lookup",
            "Look up a value by key.",
            json!({
                "type": "object",
                "properties": { "key": { "type": "string" } },
                "required": ["key"]
            }),
        )
    }

    async fn call(&self, input: ToolInput) -> Result<ToolOutput, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = input
            .get("key")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput("missing key".into()))?;
        let mut out = ToolOutput::new();
        out.insert("value".into(), json!(format!("value-of-{}", key)));
        Ok(out)
    }
}

struct PanickingTool;

#[async_trait]
impl Tool for PanickingTool {
    fn name(&self) -> &str {
        "explode"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new("explode", "Always panics.", json!({ "type": "object" }))
    }

    async fn call(&self, _input: ToolInput) -> Result<ToolOutput, ToolError> {
        panic!("tool blew up")
    }
}

fn registry(calls: &Arc<AtomicUsize>) -> Arc<ToolRegistry> {
    let registry = ToolRegistry::new()
        .with(Box::new(LookupTool {
            calls: calls.clone(),
        }))
        .with(Box::new(PanickingTool));
    Arc::new(registry)
}

fn options(budget: u32) -> ReactOptions {
    ReactOptions::builder()
        .iteration_budget(budget)
        .build()
        .unwrap()
}

const LOOKUP_ACTION: &str = r#"{"thought": "need data", "action": {"name": "lookup", "input": {"key": "k"}}}"#;

/// **Scenario**: model answers immediately; one iteration, one entry.
#[tokio::test]
async fn immediate_answer_returns_it_with_single_entry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let runner = ReactRunner::new(
        Arc::new(MockLlm::answering("X")),
        registry(&calls),
        options(10),
    );
    let outcome = runner.process("What is X?").await;
    assert_eq!(outcome.answer, "X");
    assert!(outcome.is_answered());
    assert_eq!(outcome.history.len(), 1);
    assert_eq!(outcome.history.entries()[0], HistoryEntry::answer("X"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// **Scenario**: the same decision inside a ```json fence parses identically.
#[tokio::test]
async fn fenced_reply_behaves_like_bare_reply() {
    let calls = Arc::new(AtomicUsize::new(0));
    let fenced = MockLlm::new([
        format!("Let me check.\n```json\n{}\n```", LOOKUP_ACTION),
        "```\n{\"answer\": \"done\"}\n```".to_string(),
    ]);
    let bare = MockLlm::new([LOOKUP_ACTION, r#"{"answer": "done"}"#]);

    let a = ReactRunner::new(Arc::new(fenced), registry(&calls), options(5))
        .process("q")
        .await;
    let b = ReactRunner::new(Arc::new(bare), registry(&calls), options(5))
        .process("q")
        .await;
    assert_eq!(a.answer, "done");
    assert_eq!(a.history, b.history);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// **Scenario**: malformed JSON is noted and the next iteration succeeds.
#[tokio::test]
async fn malformed_reply_is_recorded_then_recovered() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = MockLlm::new(["{\"answer\": \"oops\",}", r#"{"answer": "fine"}"#]);
    let outcome = ReactRunner::new(Arc::new(llm), registry(&calls), options(5))
        .process("q")
        .await;

    assert_eq!(outcome.answer, "fine");
    assert_eq!(outcome.iterations, 2);
    assert_eq!(outcome.history.len(), 2);
    let first = &outcome.history.entries()[0];
    assert!(first.is_error());
    assert!(first
        .to_string()
        .starts_with("Error: Error parsing JSON response:"));
}

/// **Scenario**: a reply with neither key is a schema error, not a crash.
#[tokio::test]
async fn reply_without_answer_or_action_is_noted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = MockLlm::new([r#"{"thought": "hmm"}"#, r#"{"answer": "ok"}"#]);
    let outcome = ReactRunner::new(Arc::new(llm), registry(&calls), options(5))
        .process("q")
        .await;
    assert_eq!(outcome.answer, "ok");
    assert!(outcome.history.entries()[0].is_error());
}

/// **Scenario**: unknown tool name produces a note listing the available tools.
#[tokio::test]
async fn unknown_tool_is_noted_with_available_names() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = MockLlm::new([
        r#"{"action": {"name": "teleport", "input": {}}}"#,
        r#"{"answer": "gave up teleporting"}"#,
    ]);
    let outcome = ReactRunner::new(Arc::new(llm), registry(&calls), options(5))
        .process("q")
        .await;

    assert_eq!(
        outcome.history.entries()[0],
        HistoryEntry::error("Tool 'teleport' is not available. Please use only: lookup, explode")
    );
    assert_eq!(outcome.answer, "gave up teleporting");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// **Scenario**: a tool's own error becomes an execution note.
#[tokio::test]
async fn tool_error_is_noted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = MockLlm::new([
        r#"{"action": {"name": "lookup", "input": {}}}"#,
        r#"{"answer": "no key"}"#,
    ]);
    let outcome = ReactRunner::new(Arc::new(llm), registry(&calls), options(5))
        .process("q")
        .await;
    assert_eq!(
        outcome.history.entries()[0],
        HistoryEntry::error("Error executing tool 'lookup': invalid input: missing key")
    );
}

/// **Scenario**: a panicking tool does not take the loop down.
#[tokio::test]
async fn tool_panic_is_contained() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = MockLlm::new([
        r#"{"action": {"name": "explode", "input": {}}}"#,
        r#"{"answer": "survived"}"#,
    ]);
    let outcome = ReactRunner::new(Arc::new(llm), registry(&calls), options(5))
        .process("q")
        .await;
    assert_eq!(outcome.answer, "survived");
    let note = outcome.history.entries()[0].to_string();
    assert!(note.starts_with("Error: Error executing tool 'explode':"));
    assert!(note.contains("tool blew up"));
}

/// **Scenario**: budget 1 with a model that always acts; tool runs once, budget answer.
#[tokio::test]
async fn budget_of_one_runs_tool_once_then_gives_up() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = Arc::new(MockLlm::always(LOOKUP_ACTION));
    let outcome = ReactRunner::new(llm.clone(), registry(&calls), options(1))
        .process("q")
        .await;

    assert_eq!(outcome.answer, BUDGET_EXHAUSTED_ANSWER);
    assert_eq!(outcome.termination, Termination::BudgetExhausted);
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.history.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(llm.call_count(), 1);
}

/// **Scenario**: the model is called at most budget times and history never exceeds it.
#[tokio::test]
async fn model_calls_never_exceed_budget() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = Arc::new(MockLlm::always("not json at all"));
    let outcome = ReactRunner::new(llm.clone(), registry(&calls), options(4))
        .process("q")
        .await;
    assert_eq!(llm.call_count(), 4);
    assert_eq!(outcome.history.len(), 4);
    assert!(outcome.history.iter().all(HistoryEntry::is_error));
    assert_eq!(outcome.answer, BUDGET_EXHAUSTED_ANSWER);
}

/// **Scenario**: iteration n sees exactly the entries of iterations 1..n-1.
#[tokio::test]
async fn each_prompt_carries_all_prior_entries() {
    let calls = Arc::new(AtomicUsize::new(0));
    let tools = registry(&calls);
    let catalog = tools.specs();
    let llm = Arc::new(MockLlm::new([
        LOOKUP_ACTION,
        "garbage",
        r#"{"answer": "value-of-k"}"#,
    ]));
    let outcome = ReactRunner::new(llm.clone(), tools, options(5))
        .process("Find k")
        .await;

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 3);
    let entries = outcome.history.entries();
    for (n, prompt) in prompts.iter().enumerate() {
        let mut prior = History::new();
        for entry in &entries[..n] {
            prior.push(entry.clone());
        }
        assert_eq!(prompt, &compose_prompt("Find k", &prior, &catalog));
    }
    assert!(prompts[0].contains("No previous observations."));
    assert!(prompts[1].contains(r#"Tool 'lookup' returned: {"value":"value-of-k"}"#));
}

/// **Scenario**: a failing model call is noted and retried next iteration.
#[tokio::test]
async fn model_failure_is_noted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = MockLlm::scripted([
        Err(LlmError::Http {
            status: 503,
            body: "unavailable".into(),
        }),
        Ok(r#"{"answer": "back"}"#.into()),
    ]);
    let outcome = ReactRunner::new(Arc::new(llm), registry(&calls), options(5))
        .process("q")
        .await;
    assert_eq!(outcome.answer, "back");
    assert_eq!(
        outcome.history.entries()[0],
        HistoryEntry::error("Model call failed: provider returned HTTP 503: unavailable")
    );
}

/// Panics on its first call, answers afterwards.
struct FlakyPanicLlm {
    calls: AtomicUsize,
}

#[async_trait]
impl LlmClient for FlakyPanicLlm {
    async fn invoke(&self, _prompt: &str) -> Result<LlmResponse, LlmError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("client bug");
        }
        Ok(LlmResponse::text(r#"{"answer": "recovered"}"#))
    }
}

/// **Scenario**: a panicking model client is noted and the next iteration answers.
#[tokio::test]
async fn model_panic_is_contained() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = Arc::new(FlakyPanicLlm {
        calls: AtomicUsize::new(0),
    });
    let runner = ReactRunner::new(llm.clone(), registry(&calls), options(3));
    let outcome = tokio::spawn(async move { runner.process("q").await })
        .await
        .expect("process must not unwind");

    assert_eq!(outcome.answer, "recovered");
    assert_eq!(outcome.termination, Termination::Answered);
    assert_eq!(outcome.history.len(), 2);
    assert_eq!(
        outcome.history.entries()[0],
        HistoryEntry::error("Model call panicked: client bug")
    );
    assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
}

/// **Scenario**: a model call slower than the timeout is noted as a failure.
#[tokio::test(start_paused = true)]
async fn slow_model_times_out() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = MockLlm::answering("late").with_delay(Duration::from_secs(30));
    let options = ReactOptions::builder()
        .iteration_budget(2)
        .model_timeout(Some(Duration::from_secs(1)))
        .build()
        .unwrap();
    let outcome = ReactRunner::new(Arc::new(llm), registry(&calls), options)
        .process("q")
        .await;
    assert_eq!(outcome.termination, Termination::BudgetExhausted);
    assert_eq!(outcome.history.len(), 2);
    assert_eq!(
        outcome.history.entries()[0],
        HistoryEntry::error("Model call timed out after 1s")
    );
}

/// **Scenario**: under Abort the first failure ends the run.
#[tokio::test]
async fn abort_policy_stops_at_first_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = Arc::new(MockLlm::new(["nope", r#"{"answer": "never"}"#]));
    let options = ReactOptions::builder()
        .error_policy(ErrorPolicy::Abort)
        .build()
        .unwrap();
    let outcome = ReactRunner::new(llm.clone(), registry(&calls), options)
        .process("q")
        .await;
    assert_eq!(outcome.termination, Termination::Aborted);
    assert!(outcome.answer.starts_with("I had to stop because of an error:"));
    assert_eq!(outcome.history.len(), 1);
    assert_eq!(llm.call_count(), 1);
}

/// **Scenario**: each process call starts from an empty history.
#[tokio::test]
async fn repeated_queries_do_not_share_history() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = Arc::new(MockLlm::new([
        LOOKUP_ACTION,
        r#"{"answer": "first"}"#,
        r#"{"answer": "second"}"#,
    ]));
    let runner = ReactRunner::new(llm.clone(), registry(&calls), options(5));

    let first = runner.process("one").await;
    let second = runner.process("two").await;
    assert_eq!(first.history.len(), 2);
    assert_eq!(second.answer, "second");
    assert_eq!(second.history.len(), 1);
    assert!(llm.prompts()[2].contains("No previous observations."));
}

/// **Scenario**: two queries in flight on one runner keep separate histories.
#[tokio::test]
async fn concurrent_queries_are_independent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = Arc::new(MockLlm::answering("same"));
    let runner = ReactRunner::new(llm.clone(), registry(&calls), options(3));

    let (a, b) = tokio::join!(runner.process("first"), runner.process("second"));
    assert_eq!(a.history.len(), 1);
    assert_eq!(b.history.len(), 1);
    assert_eq!(llm.call_count(), 2);
    let prompts = llm.prompts();
    assert!(prompts.iter().any(|p| p.contains("first")));
    assert!(prompts.iter().any(|p| p.contains("second")));
}

/// **Scenario**: cancelling from an event callback stops before the next iteration.
#[tokio::test]
async fn cancel_between_iterations() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = Arc::new(MockLlm::always(LOOKUP_ACTION));
    let runner = ReactRunner::new(llm.clone(), registry(&calls), options(10));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    let outcome = runner
        .process_cancellable("q", &cancel, |event| {
            if matches!(event, LoopEvent::EntryAppended { .. }) {
                trigger.cancel();
            }
        })
        .await;
    assert_eq!(outcome.termination, Termination::Cancelled);
    assert_eq!(outcome.answer, CANCELLED_ANSWER);
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.history.len(), 1);
    assert_eq!(llm.call_count(), 1);
}

/// **Scenario**: tool requests surface the model's thought in events.
#[tokio::test]
async fn tool_request_event_carries_thought() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = MockLlm::new([LOOKUP_ACTION, r#"{"answer": "a"}"#]);
    let mut requested = Vec::new();
    ReactRunner::new(Arc::new(llm), registry(&calls), options(5))
        .process_with_events("q", |event| {
            if let LoopEvent::ToolRequested {
                tool_name, thought, ..
            } = event
            {
                requested.push((tool_name, thought));
            }
        })
        .await;
    assert_eq!(
        requested,
        vec![("lookup".to_string(), Some("need data".to_string()))]
    );
}

/// **Scenario**: the outcome serializes with answer, termination and tagged history.
#[tokio::test]
async fn outcome_serializes_to_json() {
    let calls = Arc::new(AtomicUsize::new(0));
    let llm = MockLlm::new([LOOKUP_ACTION, r#"{"answer": "v"}"#]);
    let outcome = ReactRunner::new(Arc::new(llm), registry(&calls), options(5))
        .process("q")
        .await;
    let v = serde_json::to_value(&outcome).unwrap();
    assert_eq!(v["answer"], "v");
    assert_eq!(v["termination"], "answered");
    assert_eq!(v["iterations"], 2);
    assert_eq!(v["history"][0]["type"], "tool_observation");
    assert_eq!(v["history"][0]["tool_name"], "lookup");
    assert_eq!(v["history"][1]["type"], "assistant_answer");
}
