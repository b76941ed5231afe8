//! Geographic primitives: points, bounding boxes and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.7613;

/// Miles per degree of latitude, as used for corridor boxes.
pub const MILES_PER_DEGREE: f64 = 69.0;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in miles.
    pub fn miles_to(&self, other: &GeoPoint) -> f64 {
        haversine_miles(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Haversine distance between two positions, in statute miles.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push `a` fractionally above 1 for antipodal points.
    2.0 * EARTH_RADIUS_MILES * a.sqrt().min(1.0).asin()
}

/// An axis-aligned latitude/longitude box with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// Box extending `radius_miles` around `center` in every direction.
    ///
    /// Longitude degrees shrink with latitude, so the half-width is scaled by
    /// `1 / cos(lat)`. The cosine is floored at 0.1 near the poles.
    pub fn around(center: GeoPoint, radius_miles: f64) -> Self {
        let dlat = radius_miles / MILES_PER_DEGREE;
        let dlon = radius_miles / (MILES_PER_DEGREE * center.lat.to_radians().cos().max(0.1));

        Self {
            lat_min: center.lat - dlat,
            lat_max: center.lat + dlat,
            lon_min: center.lon - dlon,
            lon_max: center.lon + dlon,
        }
    }

    /// Whether `point` lies inside the box, bounds included.
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.lat_min
            && point.lat <= self.lat_max
            && point.lon >= self.lon_min
            && point.lon <= self.lon_max
    }
}
