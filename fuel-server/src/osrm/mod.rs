//! OSRM routing client.
//!
//! Talks to the OSRM `route` service and returns the full-resolution route
//! geometry as a precision 1e5 polyline, which is what the planner decodes.

mod client;
mod types;

pub use client::{OsrmClient, OsrmConfig};
pub use types::{OsrmRoute, RouteResponse};
