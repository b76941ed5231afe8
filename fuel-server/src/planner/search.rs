//! End-to-end planning for one route.

use tracing::debug;

use crate::domain::GeoPoint;
use crate::route::Route;
use crate::stations::StationCatalog;

use super::config::PlannerConfig;
use super::corridor::gather_candidates;
use super::error::PlanError;
use super::fuel::{FuelPlan, Vehicle, min_cost_plan};
use super::project::{Candidate, project_onto_route};
use super::start::select_start_station;

/// Request for a fuel plan along an already routed trip.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Where the trip starts; the first fill-up is searched around here.
    pub origin: GeoPoint,

    /// Route geometry as an encoded polyline (precision 1e5).
    pub encoded_polyline: String,

    /// Lateral search distance around the route (miles).
    pub corridor_miles: f64,

    pub vehicle: Vehicle,
}

impl PlanRequest {
    /// Create a new plan request.
    pub fn new(
        origin: GeoPoint,
        encoded_polyline: impl Into<String>,
        corridor_miles: f64,
        vehicle: Vehicle,
    ) -> Self {
        Self {
            origin,
            encoded_polyline: encoded_polyline.into(),
            corridor_miles,
            vehicle,
        }
    }

    /// Validate the plan request.
    pub fn validate(&self) -> Result<(), PlanError> {
        self.vehicle.validate()?;

        if !(self.corridor_miles.is_finite() && self.corridor_miles >= 0.0) {
            return Err(PlanError::InvalidVehicle(format!(
                "corridor_miles must be a non-negative number, got {}",
                self.corridor_miles
            )));
        }

        Ok(())
    }
}

/// Result of planning.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Route length measured from the decoded geometry.
    pub total_miles: f64,

    pub plan: FuelPlan,

    /// Number of stops fed to the optimizer, including the start station.
    pub candidates_considered: usize,
}

/// Fuel planner over a station catalog.
pub struct Planner<'a, C: StationCatalog + ?Sized> {
    catalog: &'a C,
    config: &'a PlannerConfig,
}

impl<'a, C: StationCatalog + ?Sized> Planner<'a, C> {
    /// Create a new planner.
    pub fn new(catalog: &'a C, config: &'a PlannerConfig) -> Self {
        Self { catalog, config }
    }

    /// Plan fuel purchases for a trip.
    pub fn plan(&self, request: &PlanRequest) -> Result<PlanOutcome, PlanError> {
        request.validate()?;

        let route = Route::from_encoded(&request.encoded_polyline)?;
        if route.len() < 2 {
            return Err(PlanError::RouteTooShort {
                points: route.len(),
            });
        }

        let corridor = gather_candidates(self.catalog, &route, request.corridor_miles, self.config)?;
        let projected = project_onto_route(corridor.into_values(), &route);
        let total_miles = route.total_miles();

        debug!(
            vertices = route.len(),
            total_miles,
            corridor_stations = projected.len(),
            "route projected"
        );

        let start = select_start_station(self.catalog, request.origin, self.config.start_radius_miles)?
            .ok_or(PlanError::NoStartStation)?;

        // The start station is always the first stop, whatever its true offset.
        let offroute_miles = start
            .location
            .map(|loc| loc.miles_to(&request.origin))
            .unwrap_or_default();
        let mut stops = Vec::with_capacity(projected.len() + 1);
        stops.push(Candidate {
            station: start,
            route_miles: 0.0,
            offroute_miles,
        });
        stops.extend(projected);

        let plan = min_cost_plan(&stops, total_miles, &request.vehicle)?;

        Ok(PlanOutcome {
            total_miles,
            plan,
            candidates_considered: stops.len(),
        })
    }
}
