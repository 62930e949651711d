use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{ToolError, ToolSpec};

/// Input object passed to a tool (the model's `action.input`).
pub type ToolInput = Map<String, Value>;

/// Structured result returned by a tool; recorded verbatim as an observation.
pub type ToolOutput = Map<String, Value>;

/// A single capability the model can invoke by name.
///
/// Tools are registered in a [`ToolRegistry`](super::ToolRegistry) at startup and
/// resolved by name when the model requests an action. A tool validates its own
/// input; returning `Err` becomes an error note the model sees on its next turn.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use react_loop::tools::{Tool, ToolError, ToolInput, ToolOutput, ToolSpec};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Tool for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec::new("echo", "Returns its input.", serde_json::json!({ "type": "object" }))
///     }
///
///     async fn call(&self, input: ToolInput) -> Result<ToolOutput, ToolError> {
///         Ok(input)
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name; the key the model uses in `action.name`.
    fn name(&self) -> &str;

    /// Descriptor rendered into the prompt's tool catalog.
    fn spec(&self) -> ToolSpec;

    /// Runs the tool once. May perform async work (network, disk).
    async fn call(&self, input: ToolInput) -> Result<ToolOutput, ToolError>;
}
