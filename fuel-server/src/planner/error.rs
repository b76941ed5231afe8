//! Planning failures.

use crate::route::PolylineError;
use crate::stations::StationError;

/// Error from fuel planning.
///
/// Every variant is terminal for the request: no partial plan is produced.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Fuel economy, range or corridor width is not usable
    #[error("invalid vehicle parameters: {0}")]
    InvalidVehicle(String),

    /// The route geometry could not be decoded
    #[error("bad route polyline: {0}")]
    BadPolyline(#[from] PolylineError),

    /// The route geometry has fewer than two points
    #[error("route has {points} point(s), need at least 2")]
    RouteTooShort { points: usize },

    /// No priced station near the origin for the first fill-up
    #[error("no priced fuel station near the origin")]
    NoStartStation,

    /// Two consecutive stops are further apart than the vehicle range
    #[error("no feasible plan: gap of {gap_miles:.1} miles exceeds vehicle range")]
    NoFeasiblePlan { gap_miles: f64 },

    /// The station catalog could not be queried
    #[error("station catalog error: {0}")]
    Catalog(#[from] StationError),
}

impl PlanError {
    /// Stable machine-readable code reported to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::InvalidVehicle(_) => "INVALID_VEHICLE",
            PlanError::BadPolyline(_) | PlanError::RouteTooShort { .. } => "BAD_ROUTE_POLYLINE",
            PlanError::NoStartStation => "NO_START_FUEL_STATION_NEAR_ORIGIN",
            PlanError::NoFeasiblePlan { .. } => "NO_FEASIBLE_PLAN",
            PlanError::Catalog(_) => "CATALOG_UNAVAILABLE",
        }
    }
}
