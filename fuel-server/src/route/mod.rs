//! Route geometry.
//!
//! A [`Route`] is the decoded driving geometry together with the cumulative
//! great-circle distance to every vertex. Cumulative miles are the
//! coordinate system the planner uses for station positions.

mod polyline;

pub use polyline::{PolylineError, decode_polyline};
#[cfg(test)]
pub(crate) use polyline::encode_polyline;

use crate::domain::GeoPoint;

/// Decoded route geometry with cumulative distances.
///
/// Invariant: `cumulative.len() == points.len()`, `cumulative[0] == 0` and
/// `cumulative` is non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<GeoPoint>,
    cumulative: Vec<f64>,
}

impl Route {
    /// Build a route from already decoded points.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        let cumulative = cumulative_miles(&points);
        Self { points, cumulative }
    }

    /// Decode an encoded polyline and measure it.
    pub fn from_encoded(encoded: &str) -> Result<Self, PolylineError> {
        Ok(Self::new(decode_polyline(encoded)?))
    }

    /// Route vertices, origin first.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Distance from the origin to each vertex, in miles.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Total route length in miles (0 for an empty route).
    pub fn total_miles(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Running great-circle length of a point sequence.
///
/// Returns one entry per point; the first is always 0.
pub fn cumulative_miles(points: &[GeoPoint]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;

    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += points[i - 1].miles_to(point);
        }
        cumulative.push(total);
    }

    cumulative
}
