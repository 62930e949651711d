//! check_conditions: traffic and weather delays for a route.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;

use super::{TRAFFIC_EVENTS, WEATHER_CONDITIONS};
use crate::tools::{required_str, Tool, ToolError, ToolInput, ToolOutput, ToolSpec};

pub const TOOL_CHECK_CONDITIONS: &str = "check_conditions";

const NO_CONDITIONS: &str = "No major conditions reported";

/// Reports current delays and conditions for `route_id`.
pub struct CheckConditionsTool;

fn one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[async_trait]
impl Tool for CheckConditionsTool {
    fn name(&self) -> &str {
        TOOL_CHECK_CONDITIONS
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            TOOL_CHECK_CONDITIONS,
            "Check current traffic and weather conditions for a specific route.\n\n\
             Parameters:\n\
             - route_id: Route identifier from find_routes\n\n\
             Returns conditions object with:\n\
             - traffic_delay_hours: Current traffic delays\n\
             - weather_delay_hours: Expected weather-related delays\n\
             - conditions: Description of major conditions affecting route",
            json!({
                "type": "object",
                "properties": {
                    "route_id": { "type": "string", "description": "Route identifier from find_routes" }
                },
                "required": ["route_id"]
            }),
        )
    }

    async fn call(&self, input: ToolInput) -> Result<ToolOutput, ToolError> {
        let route_id = required_str(&input, "route_id")?;

        let mut rng = rand::thread_rng();
        let traffic_delay = one_decimal(rng.gen_range(0.0..=4.0));
        let weather_delay = one_decimal(rng.gen_range(0.0..=3.0));

        let mut conditions: Vec<&str> = Vec::new();
        if rng.gen_bool(0.7) {
            conditions.extend(TRAFFIC_EVENTS.choose(&mut rng));
        }
        if rng.gen_bool(0.6) {
            conditions.extend(WEATHER_CONDITIONS.choose(&mut rng));
        }
        let conditions = if conditions.is_empty() {
            NO_CONDITIONS.to_string()
        } else {
            conditions.join(" and ")
        };

        let mut out = ToolOutput::new();
        out.insert("route_id".into(), json!(route_id));
        out.insert("traffic_delay_hours".into(), json!(traffic_delay));
        out.insert("weather_delay_hours".into(), json!(weather_delay));
        out.insert("conditions".into(), json!(conditions));
        Ok(out)
    }
}
