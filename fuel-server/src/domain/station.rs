//! Fuel station types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;

/// Catalog-assigned identifier of a fuel station.
///
/// Unique within a catalog; used as the deduplication key when the same
/// station is found from several corridor samples.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fuel station as seen by the planner.
///
/// Stations without a price are never returned by catalog queries.
/// Stations without a location cannot be matched against a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub city: String,
    pub state: String,
    /// Retail price per gallon.
    pub price: Option<f64>,
    pub location: Option<GeoPoint>,
}

impl Station {
    /// Price and location, if the station can take part in planning.
    pub fn plannable(&self) -> Option<(f64, GeoPoint)> {
        Some((self.price?, self.location?))
    }
}
