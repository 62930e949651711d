//! Tool descriptors shown to the model in the prompt.

use serde::{Deserialize, Serialize};

/// Name, description and parameter schema of one tool.
///
/// The schema is descriptive only: the loop never validates tool input against
/// it. Serialized with the key `parameters`, which is what the prompt shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "parameters")]
    pub input_schema: serde_json::Value,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}
