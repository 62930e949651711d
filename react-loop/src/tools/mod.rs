//! Tools: the [`Tool`] trait, descriptors, the name-keyed [`ToolRegistry`], and the
//! demo logistics tools.

pub mod logistics;
mod registry;
mod spec;
mod r#trait;

pub use logistics::{
    register_logistics_tools, CheckConditionsTool, DispatchTruckTool, FindRoutesTool,
    TOOL_CHECK_CONDITIONS, TOOL_DISPATCH_TRUCK, TOOL_FIND_ROUTES,
};
pub use r#trait::{Tool, ToolInput, ToolOutput};
pub use registry::ToolRegistry;
pub use spec::ToolSpec;

/// Error returned by a tool's own `call`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// Input missing a required field or of the wrong type.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The tool ran and failed.
    #[error("{0}")]
    Failed(String),
}

/// Returns the string field `key` of `input`, or `InvalidInput`.
pub(crate) fn required_str<'a>(input: &'a ToolInput, key: &str) -> Result<&'a str, ToolError> {
    input
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidInput(format!("missing required string field '{}'", key)))
}
