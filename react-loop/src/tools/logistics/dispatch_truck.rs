//! dispatch_truck: assign a truck and driver to a route.

use async_trait::async_trait;
use chrono::{Duration, Local};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;

use super::{DRIVER_FIRST_NAMES, DRIVER_LAST_NAMES, TRUCK_PREFIXES};
use crate::tools::{required_str, Tool, ToolError, ToolInput, ToolOutput, ToolSpec};

pub const TOOL_DISPATCH_TRUCK: &str = "dispatch_truck";

const DEPARTURE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Confirms a truck, driver and departure time for `route_id`.
pub struct DispatchTruckTool;

#[async_trait]
impl Tool for DispatchTruckTool {
    fn name(&self) -> &str {
        TOOL_DISPATCH_TRUCK
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            TOOL_DISPATCH_TRUCK,
            "Dispatch a truck on a selected route. Assigns a truck and driver and schedules \
             departure.\n\n\
             Parameters:\n\
             - route_id: Route identifier from find_routes\n\n\
             Returns dispatch confirmation with:\n\
             - truck_id: Assigned truck\n\
             - driver: Assigned driver\n\
             - departure_time: Scheduled departure\n\
             - status: Dispatch status",
            json!({
                "type": "object",
                "properties": {
                    "route_id": { "type": "string", "description": "Route identifier to dispatch on" }
                },
                "required": ["route_id"]
            }),
        )
    }

    async fn call(&self, input: ToolInput) -> Result<ToolOutput, ToolError> {
        let route_id = required_str(&input, "route_id")?;

        let mut rng = rand::thread_rng();
        let prefix = TRUCK_PREFIXES.choose(&mut rng).copied().unwrap_or("TRK");
        let truck_id = format!("{}-{}", prefix, rng.gen_range(100..=999));
        let driver = format!(
            "{} {}",
            DRIVER_FIRST_NAMES.choose(&mut rng).copied().unwrap_or("John"),
            DRIVER_LAST_NAMES.choose(&mut rng).copied().unwrap_or("Smith"),
        );
        let delay_secs = rng.gen_range(30 * 60..=6 * 60 * 60);
        let departure = Local::now() + Duration::seconds(delay_secs);

        let mut out = ToolOutput::new();
        out.insert("route_id".into(), json!(route_id));
        out.insert("truck_id".into(), json!(truck_id));
        out.insert("driver".into(), json!(driver));
        out.insert(
            "departure_time".into(),
            json!(departure.format(DEPARTURE_FORMAT).to_string()),
        );
        out.insert("status".into(), json!("CONFIRMED"));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[tokio::test]
    async fn confirms_assignment_with_parseable_departure() {
        let input = json!({ "route_id": "RT4321" }).as_object().cloned().unwrap();
        let out = DispatchTruckTool.call(input).await.unwrap();
        assert_eq!(out["route_id"], "RT4321");
        assert_eq!(out["status"], "CONFIRMED");
        let truck = out["truck_id"].as_str().unwrap();
        assert!(TRUCK_PREFIXES.iter().any(|p| truck.starts_with(p)));
        assert_eq!(out["driver"].as_str().unwrap().split(' ').count(), 2);
        let departure = out["departure_time"].as_str().unwrap();
        assert!(NaiveDateTime::parse_from_str(departure, DEPARTURE_FORMAT).is_ok());
    }

    #[tokio::test]
    async fn non_string_route_id_is_invalid_input() {
        let input = json!({ "route_id": 7 }).as_object().cloned().unwrap();
        assert!(matches!(
            DispatchTruckTool.call(input).await,
            Err(ToolError::InvalidInput(_))
        ));
    }
}
