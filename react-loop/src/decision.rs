//! Response parser: turns raw model text into a [`Decision`].
//!
//! Models often wrap their JSON in prose or a fenced code block. The parser takes
//! the first fenced block when there is one (dropping a language tag such as
//! `json`, on its own line or in front of the object), trims it, and decodes it strictly with `serde_json`: trailing commas or
//! trailing text are syntax errors, not something to guess around.

use serde_json::{Map, Value};

const FENCE: &str = "```";

/// What the model decided to do this turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Final answer; ends the run.
    Answer {
        text: String,
        thought: Option<String>,
    },
    /// Invoke one tool with a JSON object as input.
    Action {
        tool_name: String,
        input: Map<String, Value>,
        thought: Option<String>,
    },
}

impl Decision {
    pub fn thought(&self) -> Option<&str> {
        match self {
            Self::Answer { thought, .. } | Self::Action { thought, .. } => thought.as_deref(),
        }
    }
}

/// Model output that could not be turned into a [`Decision`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Not valid JSON.
    #[error("Error parsing JSON response: {0}")]
    Syntax(String),
    /// Valid JSON with the wrong shape.
    #[error("{0}")]
    Schema(String),
}

/// Parses one raw model response.
pub fn parse_decision(raw: &str) -> Result<Decision, ParseError> {
    let body = extract_fenced_block(raw).unwrap_or(raw).trim();
    let value: Value =
        serde_json::from_str(body).map_err(|e| ParseError::Syntax(e.to_string()))?;
    let Value::Object(mut obj) = value else {
        return Err(ParseError::Schema(
            "Response is not a JSON object".to_string(),
        ));
    };

    let thought = obj
        .get("thought")
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Some(answer) = obj.remove("answer") {
        let text = match answer {
            Value::String(s) => s,
            Value::Null => {
                return Err(ParseError::Schema("'answer' must not be null".to_string()));
            }
            other => other.to_string(),
        };
        return Ok(Decision::Answer { text, thought });
    }

    if let Some(action) = obj.remove("action") {
        let Value::Object(mut action) = action else {
            return Err(ParseError::Schema(
                "'action' must be an object with 'name' and 'input'".to_string(),
            ));
        };
        let tool_name = match action.remove("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            _ => {
                return Err(ParseError::Schema(
                    "'action' is missing a string 'name'".to_string(),
                ));
            }
        };
        let input = match action.remove("input") {
            Some(Value::Object(input)) => input,
            _ => {
                return Err(ParseError::Schema(format!(
                    "'action.input' for tool '{}' must be an object",
                    tool_name
                )));
            }
        };
        return Ok(Decision::Action {
            tool_name,
            input,
            thought,
        });
    }

    Err(ParseError::Schema(
        "Response missing both 'answer' and 'action'".to_string(),
    ))
}

/// Inner text of the first fenced block, without its language tag.
///
/// An unclosed fence yields everything after the opening line. Returns `None` when
/// the text has no fence at all.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let rest = &text[start..];
    let rest = match rest.find('\n') {
        Some(nl) if is_language_tag(&rest[..nl]) => &rest[nl + 1..],
        _ => strip_inline_tag(rest),
    };
    let end = rest.find(FENCE).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Drops a tag sharing the fence line with the JSON, as in ```` ```json {"answer": "X"}``` ````.
fn strip_inline_tag(rest: &str) -> &str {
    let Some(ws) = rest.find(char::is_whitespace) else {
        return rest;
    };
    let (tag, after) = rest.split_at(ws);
    let after = after.trim_start();
    if !tag.is_empty() && is_language_tag(tag) && after.starts_with('{') {
        after
    } else {
        rest
    }
}

/// `json`, `JSON`, `json5`, or an empty tag line.
fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
}
