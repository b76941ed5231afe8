//! Fuel stop planner.
//!
//! This module implements the core planning algorithm that answers:
//! "Where along this route should the vehicle refuel, and what will it cost?"
//!
//! Stations are gathered from a corridor around the route, placed at their
//! route distance, and scanned in order by a greedy optimizer that buys
//! just enough fuel at each stop to reach a cheaper one.

mod config;
mod corridor;
mod error;
mod fuel;
mod project;
mod search;
mod start;

pub use config::{DEFAULT_CORRIDOR_MILES, DEFAULT_MAX_RANGE_MILES, DEFAULT_MPG, PlannerConfig};
pub use corridor::gather_candidates;
pub use error::PlanError;
pub use fuel::{FuelPlan, PlanEntry, Vehicle, min_cost_plan};
pub(crate) use fuel::round_to;
pub use project::{Candidate, project_onto_route};
pub use search::{PlanOutcome, PlanRequest, Planner};
pub use start::select_start_station;
