//! Prompt composer: renders `{query}`, `{history}` and `{tools}` into the ReAct template.
//!
//! Substitution is single-pass: text inserted for one placeholder is never scanned
//! again, so a query that itself contains `{history}` reaches the model verbatim.

use std::path::Path;

use crate::history::History;
use crate::tools::ToolSpec;

const PLACEHOLDER_QUERY: &str = "query";
const PLACEHOLDER_HISTORY: &str = "history";
const PLACEHOLDER_TOOLS: &str = "tools";

/// Default ReAct prompt. Braces other than the three placeholders are literal.
pub const REACT_PROMPT_TEMPLATE: &str = r#"You are a ReAct (Reasoning and Acting) agent tasked with answering the following query:

#QUERY#
{query}

#TASK#
Your goal is to reason about the query and decide on the best course of action to answer it accurately.

#INSTRUCTIONS#
1. Analyze the query and previous observations if they exist
2. Decide on the next action: use a tool or provide a final answer
3. Always respond in this exact JSON format:

If you need to use a tool:
{
    "thought": "Your detailed reasoning about what to do next",
    "action": {
        "name": "tool_name",
        "input": {
            "param1": "value1"
        }
    }
}

If you have enough information to answer:
{
    "thought": "Your final reasoning process",
    "answer": "Your comprehensive answer to the query"
}

#IMPORTANT#
- Base your reasoning on actual observations from tool use
- Use tools when you need more information
- Provide final answer only when you have sufficient information
- If a tool fails, try a different approach
- If you cannot find necessary information, admit this clearly

#PREVIOUS_OBSERVATIONS#
{history}

#AVAILABLE_TOOLS#
{tools}"#;

/// Error loading a custom prompt template.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("failed to read prompt template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("prompt template is missing the {{{0}}} placeholder")]
    MissingPlaceholder(&'static str),
}

/// A prompt template with `{query}`, `{history}` and `{tools}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            text: REACT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Uses `text` as the template. All three placeholders must be present.
    pub fn from_text(text: impl Into<String>) -> Result<Self, PromptError> {
        let text = text.into();
        for name in [PLACEHOLDER_QUERY, PLACEHOLDER_HISTORY, PLACEHOLDER_TOOLS] {
            if !text.contains(&format!("{{{}}}", name)) {
                return Err(PromptError::MissingPlaceholder(name));
            }
        }
        Ok(Self { text })
    }

    /// Reads a template file.
    pub fn load(path: &Path) -> Result<Self, PromptError> {
        let text = std::fs::read_to_string(path).map_err(|source| PromptError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_text(text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Renders the prompt for one iteration.
    pub fn render(&self, query: &str, history: &History, catalog: &[ToolSpec]) -> String {
        let history = history.render();
        let tools = render_catalog(catalog);
        let mut out = String::with_capacity(self.text.len() + query.len() + history.len() + tools.len());
        let mut rest = self.text.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let replacement = after.find('}').and_then(|close| {
                let value = match &after[..close] {
                    PLACEHOLDER_QUERY => query,
                    PLACEHOLDER_HISTORY => history.as_str(),
                    PLACEHOLDER_TOOLS => tools.as_str(),
                    _ => return None,
                };
                Some((value, close))
            });
            match replacement {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Renders the default template.
pub fn compose_prompt(query: &str, history: &History, catalog: &[ToolSpec]) -> String {
    PromptTemplate::default().render(query, history, catalog)
}

/// Pretty-printed JSON array of the tool descriptors.
fn render_catalog(catalog: &[ToolSpec]) -> String {
    serde_json::to_string_pretty(catalog).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoryEntry, NO_OBSERVATIONS};
    use serde_json::json;

    fn catalog() -> Vec<ToolSpec> {
        vec![ToolSpec::new(
            "find_routes",
            "Find routes.",
            json!({ "type": "object" }),
        )]
    }

    #[test]
    fn embeds_query_history_and_tools() {
        let mut history = History::new();
        history.push(HistoryEntry::error("Tool 'x' is not available."));
        let prompt = compose_prompt("Find a route from Boston to Miami", &history, &catalog());

        assert!(prompt.contains("#QUERY#\nFind a route from Boston to Miami\n"));
        assert!(prompt.contains("#PREVIOUS_OBSERVATIONS#\nError: Tool 'x' is not available.\n"));
        assert!(prompt.contains("\"name\": \"find_routes\""));
        assert!(prompt.contains("\"parameters\""));
        assert!(prompt.contains("\"answer\": \"Your comprehensive answer to the query\""));
    }

    #[test]
    fn empty_history_uses_placeholder() {
        let prompt = compose_prompt("q", &History::new(), &[]);
        assert!(prompt.contains(&format!("#PREVIOUS_OBSERVATIONS#\n{}\n", NO_OBSERVATIONS)));
        assert!(prompt.ends_with("#AVAILABLE_TOOLS#\n[]"));
    }

    #[test]
    fn substitution_is_single_pass() {
        let template = PromptTemplate::from_text("Q={query} H={history} T={tools}").unwrap();
        let out = template.render("what is {history}?", &History::new(), &[]);
        assert_eq!(
            out,
            format!("Q=what is {{history}}? H={} T=[]", NO_OBSERVATIONS)
        );
    }

    #[test]
    fn unknown_braces_are_kept() {
        let template = PromptTemplate::from_text("{x} {query} {history} {tools} {").unwrap();
        assert_eq!(
            template.render("q", &History::new(), &[]),
            format!("{{x}} q {} [] {{", NO_OBSERVATIONS)
        );
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let err = PromptTemplate::from_text("{query} {tools}").unwrap_err();
        assert!(matches!(err, PromptError::MissingPlaceholder("history")));
        assert_eq!(
            err.to_string(),
            "prompt template is missing the {history} placeholder"
        );
    }

    #[test]
    fn load_reads_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("react.txt");
        std::fs::write(&path, "{query}|{history}|{tools}").unwrap();
        let template = PromptTemplate::load(&path).unwrap();
        assert_eq!(template.as_str(), "{query}|{history}|{tools}");
        assert!(matches!(
            PromptTemplate::load(&dir.path().join("missing.txt")),
            Err(PromptError::Read { .. })
        ));
    }
}
