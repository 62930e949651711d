//! Demo logistics tools: find_routes, check_conditions, dispatch_truck.
//!
//! These generate plausible fake data so a run can be followed end to end without
//! any external service. A real deployment would put mapping, traffic and fleet
//! APIs behind the same [`Tool`](crate::tools::Tool) interface.

mod check_conditions;
mod dispatch_truck;
mod find_routes;

pub use check_conditions::{CheckConditionsTool, TOOL_CHECK_CONDITIONS};
pub use dispatch_truck::{DispatchTruckTool, TOOL_DISPATCH_TRUCK};
pub use find_routes::{FindRoutesTool, TOOL_FIND_ROUTES};

use crate::tools::ToolRegistry;

const MAJOR_HIGHWAYS: &[&str] = &["I-95", "I-75", "I-80", "I-90", "I-10", "I-70"];

const WEATHER_CONDITIONS: &[&str] = &[
    "Clear skies",
    "Light rain",
    "Heavy rain",
    "Snow flurries",
    "Heavy snow",
    "Fog",
    "High winds",
    "Severe thunderstorms",
];

const TRAFFIC_EVENTS: &[&str] = &[
    "Construction",
    "Accident cleanup",
    "Heavy congestion",
    "Road work",
    "Lane closure",
    "Holiday traffic",
];

const TRUCK_PREFIXES: &[&str] = &["TRK", "VEH", "FRT"];
const DRIVER_FIRST_NAMES: &[&str] = &["John", "Sarah", "Mike", "Lisa", "David", "Emma"];
const DRIVER_LAST_NAMES: &[&str] = &["Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia"];

/// Registers all three logistics tools.
pub fn register_logistics_tools(registry: &mut ToolRegistry) {
    registry.register(Box::new(FindRoutesTool));
    registry.register(Box::new(CheckConditionsTool));
    registry.register(Box::new(DispatchTruckTool));
}
