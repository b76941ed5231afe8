//! Nominatim search response types.

use serde::Deserialize;

/// One hit from `GET /search?format=jsonv2`.
///
/// Nominatim sends coordinates as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub lat: String,
    pub lon: String,
    pub display_name: Option<String>,
}

impl SearchResult {
    /// Parsed `(lat, lon)`, if both are valid numbers.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.trim().parse().ok()?;
        let lon = self.lon.trim().parse().ok()?;
        Some((lat, lon))
    }
}
