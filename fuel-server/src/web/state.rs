//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::PlannerConfig;
use crate::provider::{Geocoder, RouteProvider};
use crate::stations::StationCatalog;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Driving routes between trip endpoints
    pub routes: Arc<dyn RouteProvider>,

    /// Resolves free-text trip endpoints
    pub geocoder: Arc<dyn Geocoder>,

    /// Priced fuel stations
    pub catalog: Arc<dyn StationCatalog>,

    /// Fuel planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        routes: impl RouteProvider + 'static,
        geocoder: impl Geocoder + 'static,
        catalog: impl StationCatalog + 'static,
        config: PlannerConfig,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            geocoder: Arc::new(geocoder),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }
}
