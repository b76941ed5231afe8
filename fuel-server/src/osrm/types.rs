//! OSRM route service response types.

use serde::Deserialize;

use crate::provider::RouteSummary;

/// Response from `GET /route/v1/{profile}/{coordinates}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// `"Ok"` on success, otherwise an error code such as `"NoRoute"`.
    pub code: String,

    pub message: Option<String>,

    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// One route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    /// Meters.
    #[serde(default)]
    pub distance: f64,

    /// Seconds.
    #[serde(default)]
    pub duration: f64,

    /// Encoded polyline when requested with `geometries=polyline`.
    pub geometry: Option<String>,
}

impl RouteResponse {
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    pub fn is_no_route(&self) -> bool {
        self.code == "NoRoute"
    }

    /// The first route, if it carries a geometry.
    pub fn into_summary(self) -> Option<RouteSummary> {
        let route = self.routes.into_iter().next()?;
        let encoded_polyline = route.geometry.filter(|g| !g.is_empty())?;
        Some(RouteSummary {
            distance_meters: route.distance as u64,
            duration: format!("{}s", route.duration as i64),
            encoded_polyline,
        })
    }
}
