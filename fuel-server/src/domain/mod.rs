//! Domain types for the fuel route planner.
//!
//! Positions, boxes and stations shared by the catalog, the route codec and
//! the planner. Everything here is plain data with no I/O.

mod geo;
mod station;

pub use geo::{BoundingBox, EARTH_RADIUS_MILES, GeoPoint, MILES_PER_DEGREE, haversine_miles};
pub use station::{Station, StationId};
