//! Projection of stations onto route distance.

use crate::domain::Station;
use crate::route::Route;

/// A station placed along the route.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub station: Station,

    /// Cumulative route distance of the nearest route vertex.
    pub route_miles: f64,

    /// Great-circle distance from the station to that vertex.
    pub offroute_miles: f64,
}

/// Place each station at its nearest route vertex, ordered along the route.
///
/// Only vertices are considered, not points between them; the upstream
/// geometry is dense enough for that to be within a fraction of a mile.
/// On equal distance the earliest vertex wins. Stations with equal route
/// position keep their input order. Stations without a location are
/// dropped, as is everything when the route is empty.
pub fn project_onto_route(
    stations: impl IntoIterator<Item = Station>,
    route: &Route,
) -> Vec<Candidate> {
    let points = route.points();
    let cumulative = route.cumulative();

    let mut candidates: Vec<Candidate> = stations
        .into_iter()
        .filter_map(|station| {
            let location = station.location?;
            let (best_index, best_miles) = points
                .iter()
                .map(|vertex| location.miles_to(vertex))
                .enumerate()
                .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                    Some((_, best_d)) if best_d <= d => best,
                    _ => Some((i, d)),
                })?;

            Some(Candidate {
                station,
                route_miles: cumulative[best_index],
                offroute_miles: best_miles,
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.route_miles.total_cmp(&b.route_miles));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, StationId};
    use proptest::prelude::*;

    fn station(id: u64, lat: f64, lon: f64) -> Station {
        Station {
            id: StationId(id),
            name: format!("Stop {id}"),
            city: "Tulsa".to_string(),
            state: "OK".to_string(),
            price: Some(3.0),
            location: Some(GeoPoint::new(lat, lon)),
        }
    }

    /// Due-east route along 36N from -97.0 to -96.0 in 0.1 degree steps.
    fn eastbound_route() -> Route {
        Route::new(
            (0..=10)
                .map(|i| GeoPoint::new(36.0, -97.0 + i as f64 / 10.0))
                .collect(),
        )
    }

    #[test]
    fn snaps_to_nearest_vertex() {
        let route = eastbound_route();
        let found = project_onto_route(vec![station(1, 36.05, -96.69)], &route);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].route_miles, route.cumulative()[3]);
        let expected = GeoPoint::new(36.05, -96.69).miles_to(&route.points()[3]);
        assert!((found[0].offroute_miles - expected).abs() < 1e-12);
    }

    #[test]
    fn orders_by_route_position() {
        let route = eastbound_route();
        let found = project_onto_route(
            vec![
                station(1, 36.0, -96.1),
                station(2, 36.0, -96.9),
                station(3, 36.0, -96.5),
            ],
            &route,
        );

        let ids: Vec<_> = found.iter().map(|c| c.station.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn ties_keep_earliest_vertex() {
        // A route that doubles back over the same vertex.
        let a = GeoPoint::new(36.0, -97.0);
        let b = GeoPoint::new(36.0, -96.9);
        let route = Route::new(vec![a, b, a]);

        let found = project_onto_route(vec![station(1, 36.0, -97.0)], &route);
        assert_eq!(found[0].route_miles, 0.0);
    }

    #[test]
    fn equal_positions_keep_input_order() {
        let route = eastbound_route();
        let found = project_onto_route(
            vec![station(8, 36.01, -96.5), station(3, 35.99, -96.5)],
            &route,
        );

        let ids: Vec<_> = found.iter().map(|c| c.station.id.0).collect();
        assert_eq!(ids, vec![8, 3]);
    }

    #[test]
    fn drops_unlocated_and_handles_empty_route() {
        let mut unlocated = station(1, 0.0, 0.0);
        unlocated.location = None;
        assert!(project_onto_route(vec![unlocated], &eastbound_route()).is_empty());

        let empty = Route::new(Vec::new());
        assert!(project_onto_route(vec![station(2, 36.0, -97.0)], &empty).is_empty());
    }

    proptest! {
        /// Output is sorted by route position and every position is a vertex distance.
        #[test]
        fn output_is_sorted(
            stations in prop::collection::vec((35.5..36.5f64, -97.5..-95.5f64), 0..40),
        ) {
            let route = eastbound_route();
            let input: Vec<_> = stations
                .iter()
                .enumerate()
                .map(|(i, (lat, lon))| station(i as u64, *lat, *lon))
                .collect();

            let found = project_onto_route(input, &route);

            prop_assert_eq!(found.len(), stations.len());
            for pair in found.windows(2) {
                prop_assert!(pair[0].route_miles <= pair[1].route_miles);
            }
            for c in &found {
                prop_assert!(route.cumulative().contains(&c.route_miles));
            }
        }
    }
}
