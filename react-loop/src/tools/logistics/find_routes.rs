//! find_routes: 2–3 route options between two cities.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;

use super::MAJOR_HIGHWAYS;
use crate::tools::{required_str, Tool, ToolError, ToolInput, ToolOutput, ToolSpec};

pub const TOOL_FIND_ROUTES: &str = "find_routes";

/// Finds shipping routes between `origin` and `destination`.
pub struct FindRoutesTool;

#[async_trait]
impl Tool for FindRoutesTool {
    fn name(&self) -> &str {
        TOOL_FIND_ROUTES
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            TOOL_FIND_ROUTES,
            "Find available shipping routes between two cities. Returns multiple route options \
             with estimated base times.\n\n\
             Parameters:\n\
             - origin: Starting city (e.g. \"Boston, MA\")\n\
             - destination: End city (e.g. \"Miami, FL\")\n\n\
             Returns a list of route objects with:\n\
             - route_id: Unique identifier\n\
             - estimated_hours: Base travel time without delays\n\
             - via: Major cities or highways on route",
            json!({
                "type": "object",
                "properties": {
                    "origin": { "type": "string", "description": "Starting city" },
                    "destination": { "type": "string", "description": "Destination city" }
                },
                "required": ["origin", "destination"]
            }),
        )
    }

    async fn call(&self, input: ToolInput) -> Result<ToolOutput, ToolError> {
        let origin = required_str(&input, "origin")?;
        let destination = required_str(&input, "destination")?;

        let mut rng = rand::thread_rng();
        let count = rng.gen_range(2..=3);
        let routes: Vec<_> = (0..count)
            .map(|_| {
                let hops = rng.gen_range(1..=3);
                let via: Vec<&str> = MAJOR_HIGHWAYS
                    .choose_multiple(&mut rng, hops)
                    .copied()
                    .collect();
                json!({
                    "route_id": format!("RT{}", rng.gen_range(1000..=9999)),
                    "estimated_hours": rng.gen_range(8..=48),
                    "via": via.join(" → "),
                })
            })
            .collect();

        let mut out = ToolOutput::new();
        out.insert("routes".into(), json!(routes));
        out.insert("origin".into(), json!(origin));
        out.insert("destination".into(), json!(destination));
        Ok(out)
    }
}
