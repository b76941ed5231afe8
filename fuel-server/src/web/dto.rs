//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::GeoPoint;
use crate::planner::{
    DEFAULT_CORRIDOR_MILES, DEFAULT_MAX_RANGE_MILES, DEFAULT_MPG, PlanEntry, PlanOutcome, Vehicle,
    round_to,
};
use crate::provider::RouteSummary;

/// Request to plan fuel stops for a trip.
///
/// Each end of the trip is given as text to geocode, as coordinates, or
/// both; coordinates win.
#[derive(Debug, Deserialize)]
pub struct PlanRouteRequest {
    pub start: Option<String>,
    pub end: Option<String>,
    pub start_latlng: Option<GeoPoint>,
    pub end_latlng: Option<GeoPoint>,

    /// Lateral station search distance (miles)
    #[serde(default = "default_corridor_miles")]
    pub corridor_miles: f64,

    /// Distance on a full tank (miles)
    #[serde(default = "default_max_range_miles")]
    pub max_range_miles: f64,

    /// Fuel economy (miles per gallon)
    #[serde(default = "default_mpg")]
    pub mpg: f64,
}

fn default_corridor_miles() -> f64 {
    DEFAULT_CORRIDOR_MILES
}

fn default_max_range_miles() -> f64 {
    DEFAULT_MAX_RANGE_MILES
}

fn default_mpg() -> f64 {
    DEFAULT_MPG
}

fn is_blank(text: &Option<String>) -> bool {
    text.as_deref().is_none_or(|t| t.trim().is_empty())
}

impl PlanRouteRequest {
    /// Check that both ends of the trip are given.
    ///
    /// Blank text counts as missing.
    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.start) && self.start_latlng.is_none() {
            return Err("Provide start or start_latlng".to_string());
        }
        if is_blank(&self.end) && self.end_latlng.is_none() {
            return Err("Provide end or end_latlng".to_string());
        }
        Ok(())
    }

    pub fn vehicle(&self) -> Vehicle {
        Vehicle::new(self.mpg, self.max_range_miles)
    }
}

/// A resolved trip endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceResult {
    /// Geocoder display name, or `start_latlng`/`end_latlng` for coordinates
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl PlaceResult {
    pub fn new(name: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            name: name.into(),
            lat: point.lat,
            lon: point.lon,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Route details in a plan response.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    /// Length of the decoded geometry (3 dp)
    pub distance_miles: f64,
    /// Length reported by the routing engine
    pub distance_meters: u64,
    pub duration: String,
    pub encoded_polyline: String,
}

/// Vehicle details in a plan response.
#[derive(Debug, Serialize)]
pub struct VehicleResult {
    pub mpg: f64,
    pub max_range_miles: f64,
    pub tank_capacity_gallons: f64,
    /// Fuel needed for the whole trip (4 dp)
    pub gallons_used_total: f64,
}

/// Purchases in a plan response.
#[derive(Debug, Serialize)]
pub struct FuelPlanResult {
    pub stops: Vec<PlanEntry>,
    pub total_money_spent: f64,
}

/// Response to a plan request.
#[derive(Debug, Serialize)]
pub struct PlanRouteResponse {
    pub origin: PlaceResult,
    pub destination: PlaceResult,
    pub route: RouteResult,
    pub vehicle: VehicleResult,
    pub fuel_plan: FuelPlanResult,
}

impl PlanRouteResponse {
    /// Assemble the response from the resolved trip and its plan.
    pub fn new(
        origin: PlaceResult,
        destination: PlaceResult,
        route: RouteSummary,
        vehicle: Vehicle,
        outcome: PlanOutcome,
    ) -> Self {
        let PlanOutcome {
            total_miles, plan, ..
        } = outcome;

        Self {
            origin,
            destination,
            route: RouteResult {
                distance_miles: round_to(total_miles, 3),
                distance_meters: route.distance_meters,
                duration: route.duration,
                encoded_polyline: route.encoded_polyline,
            },
            vehicle: VehicleResult {
                mpg: vehicle.mpg,
                max_range_miles: vehicle.max_range_miles,
                tank_capacity_gallons: plan.tank_gallons_capacity,
                gallons_used_total: round_to(total_miles / vehicle.mpg, 4),
            },
            fuel_plan: FuelPlanResult {
                stops: plan.stops,
                total_money_spent: plan.total_cost,
            },
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// What the client can do instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Distance that could not be covered, for `NO_FEASIBLE_PLAN`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_miles: Option<f64>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            hint: None,
            gap_miles: None,
        }
    }
}
