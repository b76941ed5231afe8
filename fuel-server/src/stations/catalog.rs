//! Station catalog queries.

use std::fs::File;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{BoundingBox, Station};

use super::error::StationError;
use super::loader::{FuelStop, LoadSummary, load_csv};

/// Read-only access to priced fuel stations.
///
/// This abstraction allows the planner to be tested with fixed data and to
/// run against any backing store.
pub trait StationCatalog: Send + Sync {
    /// Priced stations inside `bbox`, cheapest first, at most `limit`.
    ///
    /// Stations without a price or location are never returned.
    fn query_by_bounding_box(
        &self,
        bbox: &BoundingBox,
        limit: usize,
    ) -> Result<Vec<Station>, StationError>;
}

/// Thread-safe in-memory catalog.
///
/// Holds the whole price sheet, sorted by price. Cloning is cheap and clones
/// share the same data, so a reload is seen by every holder.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<Arc<Vec<FuelStop>>>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from stations, with no price sheet extras.
    pub fn from_stations(stations: impl IntoIterator<Item = Station>) -> Self {
        let stops = stations
            .into_iter()
            .map(|station| FuelStop {
                station,
                opis_id: 0,
                address: String::new(),
                rack_id: 0,
            })
            .collect();
        let catalog = Self::new();
        catalog.replace(stops);
        catalog
    }

    /// Load a catalog from a price sheet on disk.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<(Self, LoadSummary), StationError> {
        let catalog = Self::new();
        let summary = catalog.reload_csv(path)?;
        Ok((catalog, summary))
    }

    /// Replace the catalog contents with a price sheet from disk.
    ///
    /// On failure the existing contents are kept and the error is returned.
    pub fn reload_csv(&self, path: impl AsRef<Path>) -> Result<LoadSummary, StationError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (stops, summary) = load_csv(file)?;
        self.replace(stops);
        Ok(summary)
    }

    /// Number of stops in the catalog, priced or not.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Number of stops that can be returned by queries.
    pub fn plannable_count(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|s| s.station.plannable().is_some())
            .count()
    }

    fn replace(&self, mut stops: Vec<FuelStop>) {
        // Unpriced stops sort last; ties go to the lower id.
        stops.sort_by(|a, b| {
            let pa = a.station.price.unwrap_or(f64::INFINITY);
            let pb = b.station.price.unwrap_or(f64::INFINITY);
            pa.total_cmp(&pb).then(a.station.id.cmp(&b.station.id))
        });

        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(stops);
    }

    fn snapshot(&self) -> Arc<Vec<FuelStop>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StationCatalog for InMemoryCatalog {
    fn query_by_bounding_box(
        &self,
        bbox: &BoundingBox,
        limit: usize,
    ) -> Result<Vec<Station>, StationError> {
        let stops = self.snapshot();

        Ok(stops
            .iter()
            .filter(|stop| {
                stop.station
                    .plannable()
                    .is_some_and(|(_, location)| bbox.contains(location))
            })
            .take(limit)
            .map(|stop| stop.station.clone())
            .collect())
    }
}
