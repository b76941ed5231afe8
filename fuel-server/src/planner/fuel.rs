//! Feasibility check and greedy fuel purchase plan.
//!
//! Stops are visited in route order. At each stop the vehicle buys just
//! enough fuel to reach the next strictly cheaper stop within range, or to
//! go as far as a full tank allows when there is none, counting fuel
//! already on board. This is a heuristic: it is deterministic but does not
//! always find the cheapest possible plan.

use serde::Serialize;
use tracing::debug;

use crate::domain::{GeoPoint, Station, StationId};

use super::error::PlanError;
use super::project::Candidate;

/// Slack allowed when comparing a gap against the vehicle range.
const GAP_EPSILON: f64 = 1e-6;

/// Purchases at or below this are not reported as stops.
const MIN_PURCHASE_GALLONS: f64 = 1e-6;

/// Fuel economy and range of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    pub mpg: f64,
    pub max_range_miles: f64,
}

impl Vehicle {
    pub fn new(mpg: f64, max_range_miles: f64) -> Self {
        Self {
            mpg,
            max_range_miles,
        }
    }

    /// Gallons held by a full tank.
    pub fn tank_capacity_gallons(&self) -> f64 {
        self.max_range_miles / self.mpg
    }

    /// Both values must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.mpg.is_finite() && self.mpg > 0.0) {
            return Err(PlanError::InvalidVehicle(format!(
                "mpg must be a positive number, got {}",
                self.mpg
            )));
        }
        if !(self.max_range_miles.is_finite() && self.max_range_miles > 0.0) {
            return Err(PlanError::InvalidVehicle(format!(
                "max_range_miles must be a positive number, got {}",
                self.max_range_miles
            )));
        }
        Ok(())
    }
}

/// A stop in the scan: a real station, or the end of the route.
#[derive(Debug)]
enum PlanNode<'a> {
    Real {
        station: &'a Station,
        location: GeoPoint,
        price: f64,
        route_miles: f64,
    },
    /// Destination marker. Never bought from.
    Terminal { route_miles: f64 },
}

impl PlanNode<'_> {
    fn route_miles(&self) -> f64 {
        match self {
            PlanNode::Real { route_miles, .. } | PlanNode::Terminal { route_miles } => *route_miles,
        }
    }

    fn price(&self) -> f64 {
        match self {
            PlanNode::Real { price, .. } => *price,
            PlanNode::Terminal { .. } => f64::INFINITY,
        }
    }
}

/// One purchase in the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    pub id: StationId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub lat: f64,
    pub lon: f64,
    pub price: f64,
    pub route_miles: f64,
    pub gallons_bought: f64,
    pub cost: f64,
}

/// The purchase plan for a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelPlan {
    /// Purchases in route order.
    pub stops: Vec<PlanEntry>,
    pub total_cost: f64,
    pub tank_gallons_capacity: f64,
}

/// Plan fuel purchases over `candidates`, which must include a stop at
/// mile 0 for the vehicle to start with fuel.
///
/// Candidates past `total_miles` and candidates without a price or location
/// are ignored. Fails with [`PlanError::NoFeasiblePlan`] if any two
/// consecutive stops, or the last stop and the destination, are further
/// apart than the vehicle range.
pub fn min_cost_plan(
    candidates: &[Candidate],
    total_miles: f64,
    vehicle: &Vehicle,
) -> Result<FuelPlan, PlanError> {
    vehicle.validate()?;

    let range = vehicle.max_range_miles;
    let mpg = vehicle.mpg;
    let tank = vehicle.tank_capacity_gallons();

    let nodes = build_nodes(candidates, total_miles);
    check_gaps(&nodes, range)?;

    let mut fuel = 0.0;
    let mut total_cost = 0.0;
    let mut stops = Vec::new();

    for (i, pair) in nodes.windows(2).enumerate() {
        let (here, next) = (&pair[0], &pair[1]);
        let here_mile = here.route_miles();
        let here_price = here.price();

        let target_miles = next_cheaper_within_range(&nodes[i + 1..], here_mile, here_price, range)
            .unwrap_or_else(|| total_miles.min(here_mile + range));

        let needed = (target_miles - here_mile) / mpg;
        let bought = (tank.min(needed) - fuel).max(0.0);
        let cost = bought * here_price;

        total_cost += cost;
        fuel += bought;
        fuel -= (next.route_miles() - here_mile) / mpg;

        if let PlanNode::Real {
            station,
            location,
            price,
            route_miles,
        } = here
            && bought > MIN_PURCHASE_GALLONS
        {
            stops.push(PlanEntry {
                id: station.id,
                name: station.name.clone(),
                city: station.city.clone(),
                state: station.state.clone(),
                lat: location.lat,
                lon: location.lon,
                price: *price,
                route_miles: round_to(*route_miles, 3),
                gallons_bought: round_to(bought, 4),
                cost: round_to(cost, 4),
            });
        }
    }

    debug!(
        nodes = nodes.len(),
        stops = stops.len(),
        total_cost,
        "fuel plan computed"
    );

    Ok(FuelPlan {
        stops,
        total_cost: round_to(total_cost, 4),
        tank_gallons_capacity: round_to(tank, 4),
    })
}

/// Stops on the route in order, followed by the destination marker.
fn build_nodes(candidates: &[Candidate], total_miles: f64) -> Vec<PlanNode<'_>> {
    let mut nodes: Vec<PlanNode<'_>> = candidates
        .iter()
        .filter(|c| c.route_miles <= total_miles)
        .filter_map(|c| {
            let (price, location) = c.station.plannable()?;
            Some(PlanNode::Real {
                station: &c.station,
                location,
                price,
                route_miles: c.route_miles,
            })
        })
        .collect();

    nodes.push(PlanNode::Terminal {
        route_miles: total_miles,
    });
    // Stable, so the terminal stays after any stop at the destination.
    nodes.sort_by(|a, b| a.route_miles().total_cmp(&b.route_miles()));
    nodes
}

/// Reject the route if any consecutive gap is beyond the vehicle range.
fn check_gaps(nodes: &[PlanNode<'_>], range: f64) -> Result<(), PlanError> {
    for pair in nodes.windows(2) {
        let gap_miles = pair[1].route_miles() - pair[0].route_miles();
        if gap_miles > range + GAP_EPSILON {
            return Err(PlanError::NoFeasiblePlan { gap_miles });
        }
    }
    Ok(())
}

/// Position of the first stop ahead that is strictly cheaper and within
/// range. The scan stops at the first stop out of range.
fn next_cheaper_within_range(
    ahead: &[PlanNode<'_>],
    here_mile: f64,
    here_price: f64,
    range: f64,
) -> Option<f64> {
    ahead
        .iter()
        .take_while(|n| n.route_miles() - here_mile <= range)
        .find(|n| n.price() < here_price)
        .map(PlanNode::route_miles)
}

/// Round to `places` decimals.
///
/// Rounds the exact binary value, ties to even, so 55.08745 (stored just
/// below the half) gives 55.0874.
pub(crate) fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}
