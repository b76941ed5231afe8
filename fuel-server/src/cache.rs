//! Caching layer for routing and geocoding responses.
//!
//! Both upstreams are free public services with strict rate limits, and
//! the same trips and place names come up again and again. Route lookups
//! are keyed on coordinates rounded to 5 decimals (about a meter), place
//! lookups on the normalized query text.
//!
//! Only successful lookups are cached: a `None` may be a transient rate
//! limit and must be retried next time.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::GeoPoint;
use crate::provider::{GeocodedPlace, Geocoder, ProviderError, RouteProvider, RouteSummary};

/// Cache key for routes: origin and destination in 1e-5 degree units.
type RouteKey = (i64, i64, i64, i64);

/// Configuration for the provider caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached routes.
    pub route_ttl: Duration,

    /// TTL for cached geocoding results.
    pub geocode_ttl: Duration,

    /// Maximum number of entries in each cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            route_ttl: Duration::from_secs(24 * 60 * 60),
            geocode_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            max_capacity: 10_000,
        }
    }
}

fn coordinate_key(value: f64) -> i64 {
    (value * 1e5).round() as i64
}

/// Cache key for a route between two points.
pub fn route_key(origin: GeoPoint, destination: GeoPoint) -> RouteKey {
    (
        coordinate_key(origin.lat),
        coordinate_key(origin.lon),
        coordinate_key(destination.lat),
        coordinate_key(destination.lon),
    )
}

/// Cache key for a geocoding query.
pub fn geocode_key(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Route provider with caching.
///
/// Wraps any `RouteProvider` and caches routes it finds.
pub struct CachedRouteProvider<P> {
    inner: P,
    routes: MokaCache<RouteKey, RouteSummary>,
}

impl<P: RouteProvider> CachedRouteProvider<P> {
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.route_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, routes }
    }

    /// Get a route, using the cache if available.
    pub async fn get_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Option<RouteSummary>, ProviderError> {
        let key = route_key(origin, destination);

        if let Some(cached) = self.routes.get(&key).await {
            trace!(?key, "route cache hit");
            return Ok(Some(cached));
        }

        let found = self.inner.route(origin, destination).await?;
        if let Some(route) = &found {
            self.routes.insert(key, route.clone()).await;
        }

        Ok(found)
    }

    /// Access the underlying provider for lookups that bypass the cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn cache_entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    pub fn invalidate_cache(&self) {
        self.routes.invalidate_all();
    }
}

impl<P: RouteProvider> RouteProvider for CachedRouteProvider<P> {
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> BoxFuture<'_, Result<Option<RouteSummary>, ProviderError>> {
        self.get_route(origin, destination).boxed()
    }
}

/// Geocoder with caching.
pub struct CachedGeocoder<G> {
    inner: G,
    places: MokaCache<String, Arc<GeocodedPlace>>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let places = MokaCache::builder()
            .time_to_live(config.geocode_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, places }
    }

    /// Geocode `query`, using the cache if available.
    ///
    /// The upstream sees the query as given; only the cache key is
    /// normalized.
    pub async fn get_place(&self, query: &str) -> Result<Option<GeocodedPlace>, ProviderError> {
        let key = geocode_key(query);

        if let Some(cached) = self.places.get(&key).await {
            trace!(key = %key, "geocode cache hit");
            return Ok(Some(GeocodedPlace::clone(&cached)));
        }

        let found = self.inner.geocode(query).await?;
        if let Some(place) = &found {
            self.places.insert(key, Arc::new(place.clone())).await;
        }

        Ok(found)
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn cache_entry_count(&self) -> u64 {
        self.places.entry_count()
    }

    pub fn invalidate_cache(&self) {
        self.places.invalidate_all();
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    fn geocode<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Option<GeocodedPlace>, ProviderError>> {
        self.get_place(query).boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Route provider that counts calls and finds a route only when told to.
    #[derive(Default)]
    struct CountingRoutes {
        calls: AtomicUsize,
        found: bool,
    }

    impl RouteProvider for CountingRoutes {
        fn route(
            &self,
            _origin: GeoPoint,
            _destination: GeoPoint,
        ) -> BoxFuture<'_, Result<Option<RouteSummary>, ProviderError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let found = self.found.then(|| RouteSummary {
                distance_meters: 1609,
                duration: "60s".to_string(),
                encoded_polyline: "_p~iF~ps|U_ulLnnqC".to_string(),
            });
            async move { Ok(found) }.boxed()
        }
    }

    #[derive(Default)]
    struct CountingGeocoder {
        calls: AtomicUsize,
    }

    impl Geocoder for CountingGeocoder {
        fn geocode<'a>(
            &'a self,
            query: &'a str,
        ) -> BoxFuture<'a, Result<Option<GeocodedPlace>, ProviderError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let found = (!query.contains("nowhere")).then(|| GeocodedPlace {
                point: GeoPoint::new(35.2, -101.8),
                name: query.to_string(),
            });
            async move { Ok(found) }.boxed()
        }
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.route_ttl, Duration::from_secs(86_400));
        assert_eq!(config.geocode_ttl, Duration::from_secs(604_800));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[test]
    fn route_key_rounds_to_five_decimals() {
        let a = route_key(GeoPoint::new(40.712_801, -74.006_004), GeoPoint::new(34.05, -118.25));
        let b = route_key(GeoPoint::new(40.712_803, -74.005_996), GeoPoint::new(34.05, -118.25));
        assert_eq!(a, b);
        assert_eq!(a, (4_071_280, -7_400_600, 3_405_000, -11_825_000));

        let c = route_key(GeoPoint::new(40.712_82, -74.006), GeoPoint::new(34.05, -118.25));
        assert_ne!(a, c);
    }

    #[test]
    fn route_key_is_directional() {
        let p = GeoPoint::new(40.0, -100.0);
        let q = GeoPoint::new(41.0, -101.0);
        assert_ne!(route_key(p, q), route_key(q, p));
    }

    #[test]
    fn geocode_key_normalizes() {
        assert_eq!(geocode_key("  Amarillo, TX "), "amarillo, tx");
        assert_eq!(geocode_key("AMARILLO, TX"), geocode_key("amarillo, tx"));
    }

    #[tokio::test]
    async fn routes_are_cached() {
        let provider = CachedRouteProvider::new(
            CountingRoutes {
                found: true,
                ..Default::default()
            },
            &CacheConfig::default(),
        );
        let origin = GeoPoint::new(35.0, -101.0);
        let destination = GeoPoint::new(36.0, -100.0);

        let first = provider.route(origin, destination).await.unwrap();
        let second = provider
            .route(GeoPoint::new(35.000_001, -101.0), destination)
            .await
            .unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_routes_are_not_cached() {
        let provider = CachedRouteProvider::new(CountingRoutes::default(), &CacheConfig::default());
        let origin = GeoPoint::new(35.0, -101.0);
        let destination = GeoPoint::new(36.0, -100.0);

        assert!(provider.route(origin, destination).await.unwrap().is_none());
        assert!(provider.route(origin, destination).await.unwrap().is_none());
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn places_are_cached_by_normalized_query() {
        let geocoder = CachedGeocoder::new(CountingGeocoder::default(), &CacheConfig::default());

        let first = geocoder.geocode("Amarillo, TX").await.unwrap().unwrap();
        let second = geocoder.geocode("  amarillo, tx").await.unwrap().unwrap();

        // The cached entry keeps the name from the first lookup.
        assert_eq!(first, second);
        assert_eq!(second.name, "Amarillo, TX");
        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 1);

        assert!(geocoder.geocode("nowhere").await.unwrap().is_none());
        assert!(geocoder.geocode("nowhere").await.unwrap().is_none());
        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let geocoder = CachedGeocoder::new(CountingGeocoder::default(), &CacheConfig::default());

        geocoder.geocode("Tulsa").await.unwrap();
        geocoder.invalidate_cache();
        geocoder.geocode("Tulsa").await.unwrap();

        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 2);
    }
}
