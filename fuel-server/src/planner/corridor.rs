//! Corridor sampling.
//!
//! Walks the route and collects the cheapest priced stations within a box
//! around points spaced along it.

use std::collections::BTreeMap;

use tracing::trace;

use crate::domain::{BoundingBox, Station, StationId};
use crate::route::Route;
use crate::stations::{StationCatalog, StationError};

use super::config::PlannerConfig;

/// Slack for deciding whether a vertex has reached the next sample mark.
const SAMPLE_EPSILON: f64 = 1e-6;

/// Collect priced stations near the route.
///
/// A sample is taken at the origin and then at the first vertex at or past
/// each further multiple of the sample interval, until the next mark lies
/// beyond the end of the route. Each sample queries a box of half-size
/// `corridor_miles`. A station found by several samples appears once.
pub fn gather_candidates<C: StationCatalog + ?Sized>(
    catalog: &C,
    route: &Route,
    corridor_miles: f64,
    config: &PlannerConfig,
) -> Result<BTreeMap<StationId, Station>, StationError> {
    let total = route.total_miles();
    let mut candidates = BTreeMap::new();
    let mut next_sample = 0.0;
    let mut samples = 0usize;

    for (point, &miles) in route.points().iter().zip(route.cumulative()) {
        if miles + SAMPLE_EPSILON < next_sample {
            continue;
        }
        next_sample += config.sample_interval_miles;
        samples += 1;

        let bbox = BoundingBox::around(*point, corridor_miles);
        for station in catalog.query_by_bounding_box(&bbox, config.max_per_sample)? {
            candidates.insert(station.id, station);
        }

        if next_sample > total {
            break;
        }
    }

    trace!(samples, candidates = candidates.len(), "corridor sampled");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeoPoint;
    use crate::stations::InMemoryCatalog;
    use std::sync::Mutex;

    /// Catalog that records every query and returns a fixed answer.
    struct RecordingCatalog {
        queries: Mutex<Vec<(BoundingBox, usize)>>,
        answer: Vec<Station>,
    }

    impl RecordingCatalog {
        fn new(answer: Vec<Station>) -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
                answer,
            }
        }

        fn sample_latitudes(&self) -> Vec<f64> {
            self.queries
                .lock()
                .unwrap()
                .iter()
                .map(|(b, _)| (b.lat_min + b.lat_max) / 2.0)
                .collect()
        }
    }

    impl StationCatalog for RecordingCatalog {
        fn query_by_bounding_box(
            &self,
            bbox: &BoundingBox,
            limit: usize,
        ) -> Result<Vec<Station>, StationError> {
            self.queries.lock().unwrap().push((*bbox, limit));
            Ok(self.answer.clone())
        }
    }

    fn station(id: u64, price: f64, lat: f64, lon: f64) -> Station {
        Station {
            id: StationId(id),
            name: format!("Stop {id}"),
            city: "Waco".to_string(),
            state: "TX".to_string(),
            price: Some(price),
            location: Some(GeoPoint::new(lat, lon)),
        }
    }

    /// Due-north route from 30.0 to 31.0 in 0.1 degree steps (~6.9 mi each).
    fn northbound_route() -> Route {
        Route::new(
            (0..=10)
                .map(|i| GeoPoint::new(30.0 + i as f64 / 10.0, -97.0))
                .collect(),
        )
    }

    #[test]
    fn samples_at_origin_and_each_interval() {
        let catalog = RecordingCatalog::new(Vec::new());
        let config = PlannerConfig::default();

        gather_candidates(&catalog, &northbound_route(), 10.0, &config).unwrap();

        // Marks at 0, 20, 40 and 60 miles fall on vertices 0, 3, 6 and 9.
        let lats = catalog.sample_latitudes();
        assert_eq!(lats.len(), 4);
        for (lat, expected) in lats.iter().zip([30.0, 30.3, 30.6, 30.9]) {
            assert!((lat - expected).abs() < 1e-9, "{lat} != {expected}");
        }
    }

    #[test]
    fn passes_limit_and_corridor_width() {
        let catalog = RecordingCatalog::new(Vec::new());
        let config = PlannerConfig::new(20.0, 7, 25.0);

        gather_candidates(&catalog, &northbound_route(), 13.8, &config).unwrap();

        let queries = catalog.queries.lock().unwrap();
        let (first_box, limit) = queries[0];
        assert_eq!(limit, 7);
        assert!((first_box.lat_max - first_box.lat_min - 2.0 * 13.8 / 69.0).abs() < 1e-9);
    }

    #[test]
    fn deduplicates_by_station_id() {
        let catalog = RecordingCatalog::new(vec![
            station(5, 3.10, 30.0, -97.0),
            station(2, 3.20, 30.5, -97.0),
        ]);

        let found =
            gather_candidates(&catalog, &northbound_route(), 10.0, &PlannerConfig::default())
                .unwrap();

        assert_eq!(catalog.sample_latitudes().len(), 4);
        let ids: Vec<_> = found.keys().map(|id| id.0).collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn finds_stations_only_near_the_route() {
        let catalog = InMemoryCatalog::from_stations(vec![
            station(1, 3.00, 30.31, -97.05),
            station(2, 2.80, 30.95, -96.95),
            station(3, 2.50, 30.5, -95.0), // ~120 mi east
        ]);

        let found =
            gather_candidates(&catalog, &northbound_route(), 10.0, &PlannerConfig::default())
                .unwrap();

        let ids: Vec<_> = found.keys().map(|id| id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn single_point_route_samples_once() {
        let catalog = RecordingCatalog::new(Vec::new());
        let route = Route::new(vec![GeoPoint::new(30.0, -97.0)]);

        gather_candidates(&catalog, &route, 10.0, &PlannerConfig::default()).unwrap();

        assert_eq!(catalog.sample_latitudes(), vec![30.0]);
    }

    #[test]
    fn empty_route_queries_nothing() {
        let catalog = RecordingCatalog::new(Vec::new());
        let route = Route::new(Vec::new());

        let found = gather_candidates(&catalog, &route, 10.0, &PlannerConfig::default()).unwrap();

        assert!(found.is_empty());
        assert!(catalog.sample_latitudes().is_empty());
    }

    #[test]
    fn catalog_errors_propagate() {
        struct Down;
        impl StationCatalog for Down {
            fn query_by_bounding_box(
                &self,
                _bbox: &BoundingBox,
                _limit: usize,
            ) -> Result<Vec<Station>, StationError> {
                Err(StationError::Unavailable {
                    message: "offline".into(),
                })
            }
        }

        let err = gather_candidates(&Down, &northbound_route(), 10.0, &PlannerConfig::default())
            .unwrap_err();
        assert!(matches!(err, StationError::Unavailable { .. }));
    }
}
