//! First fill-up selection.

use crate::domain::{BoundingBox, GeoPoint, Station};
use crate::stations::{StationCatalog, StationError};

/// Cheapest priced station within `radius_miles` of the origin.
///
/// Uses the same box rule as corridor sampling, so "within" means inside
/// the latitude/longitude box rather than a true circle.
pub fn select_start_station<C: StationCatalog + ?Sized>(
    catalog: &C,
    origin: GeoPoint,
    radius_miles: f64,
) -> Result<Option<Station>, StationError> {
    let bbox = BoundingBox::around(origin, radius_miles);
    Ok(catalog.query_by_bounding_box(&bbox, 1)?.into_iter().next())
}
