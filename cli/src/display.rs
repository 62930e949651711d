//! Terminal output: banner, section separators and one-line loop event summaries.
//!
//! Answers go to stdout; progress (verbose events, separators in the REPL) goes to
//! stderr so `--json` output stays machine-readable.

use react_loop::{HistoryEntry, LoopEvent, ReactOutcome, Termination};

/// Width of separator lines.
pub(crate) const WIDTH: usize = 80;

/// Max chars of tool input / model text shown per event line.
pub(crate) const DEFAULT_EVENT_MAX_LEN: usize = 200;

/// Truncates a string to at most `max` chars; appends "..." when truncated. UTF-8 safe.
pub(crate) fn truncate_display(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    let suffix_len = 3;
    if max <= suffix_len {
        return s.chars().take(max).collect();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    format!(
        "{}{}",
        s.chars().take(max - suffix_len).collect::<String>(),
        SUFFIX
    )
}

/// A line of `ch`, or a titled block (line, centered title, line).
pub(crate) fn separator(title: &str, ch: char) -> String {
    let line: String = std::iter::repeat(ch).take(WIDTH).collect();
    if title.is_empty() {
        format!("\n{}\n", line)
    } else {
        format!("\n{}\n{:^width$}\n{}\n", line, title, line, width = WIDTH)
    }
}

pub(crate) fn welcome_banner(tools: &[String]) -> String {
    let mut out = separator("LOGISTICS ROUTE PLANNER", '=');
    out.push_str("This tool helps plan and dispatch truck routes using the ReAct framework.\n");
    out.push_str("\nCapabilities:\n");
    out.push_str("1. Find available routes between cities\n");
    out.push_str("2. Check current traffic and weather conditions\n");
    out.push_str("3. Dispatch trucks and confirm assignments\n");
    out.push_str("\nExample queries:\n");
    out.push_str("- \"Find a route from Boston to Miami\"\n");
    out.push_str("- \"What's the best route from NYC to LA with current conditions?\"\n");
    out.push_str("- \"Dispatch a truck from Chicago to Houston\"\n");
    out.push_str(&format!("\nTools: {}\n", tools.join(", ")));
    out.push_str("Type 'exit' to quit. Ctrl-C stops the running query.\n");
    out.push_str(&separator("", '-'));
    out
}

/// One stderr line per interesting event; `None` for events not shown.
pub(crate) fn format_event(event: &LoopEvent, max: usize) -> Option<String> {
    match event {
        LoopEvent::IterationStarted { iteration, budget } => {
            Some(format!("[iteration {}/{}]", iteration, budget))
        }
        LoopEvent::PromptComposed { .. } => None,
        LoopEvent::ModelResponded { content, .. } => Some(format!(
            "  model: {}",
            truncate_display(&content.replace('\n', " "), max)
        )),
        LoopEvent::ToolRequested {
            tool_name,
            input,
            thought,
            ..
        } => {
            let input = serde_json::to_string(input).unwrap_or_default();
            let call = format!("  → {}({})", tool_name, truncate_display(&input, max));
            Some(match thought {
                Some(t) => format!("  thought: {}\n{}", truncate_display(t, max), call),
                None => call,
            })
        }
        LoopEvent::EntryAppended { entry, .. } => {
            let marker = if entry.is_error() { "✗" } else { "✓" };
            Some(format!(
                "  {} {}",
                marker,
                truncate_display(&entry.to_string(), max)
            ))
        }
        LoopEvent::Finished {
            termination,
            iterations,
        } => Some(format!(
            "[{} after {} iteration{}]",
            termination.as_str(),
            iterations,
            if *iterations == 1 { "" } else { "s" }
        )),
    }
}

/// Short summary printed after a non-answered run.
pub(crate) fn outcome_note(outcome: &ReactOutcome) -> Option<String> {
    let errors = outcome
        .history
        .iter()
        .filter(|e| matches!(e, HistoryEntry::ErrorNote { .. }))
        .count();
    match outcome.termination {
        Termination::Answered => None,
        _ => Some(format!(
            "({} after {} iterations, {} error note{})",
            outcome.termination.as_str(),
            outcome.iterations,
            errors,
            if errors == 1 { "" } else { "s" }
        )),
    }
}
