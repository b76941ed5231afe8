use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use fuel_server::cache::{CacheConfig, CachedGeocoder, CachedRouteProvider};
use fuel_server::geocode::{NominatimClient, NominatimConfig};
use fuel_server::osrm::{OsrmClient, OsrmConfig};
use fuel_server::planner::PlannerConfig;
use fuel_server::stations::InMemoryCatalog;
use fuel_server::web::{AppState, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// How often to reload the fuel price sheet (24 hours).
const PRICE_RELOAD_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fuel_server=info,tower_http=info")),
        )
        .init();

    let prices_path = PathBuf::from(
        std::env::var("FUEL_STATIONS_CSV")
            .expect("FUEL_STATIONS_CSV must point to the fuel price sheet"),
    );

    // Load the price sheet (fail fast if unavailable)
    let (catalog, summary) =
        InMemoryCatalog::from_csv_path(&prices_path).expect("Failed to load fuel price sheet");
    info!(
        path = %prices_path.display(),
        stations = catalog.len(),
        plannable = catalog.plannable_count(),
        created = summary.created,
        updated = summary.updated,
        "loaded fuel price sheet"
    );
    if catalog.plannable_count() == 0 {
        warn!("no station has both a price and coordinates; every plan will fail");
    }

    // Create routing and geocoding clients
    let mut osrm_config = OsrmConfig::new();
    if let Ok(url) = std::env::var("OSRM_BASE_URL") {
        osrm_config = osrm_config.with_base_url(url);
    }
    let osrm = OsrmClient::new(osrm_config).expect("Failed to create OSRM client");

    let mut nominatim_config = NominatimConfig::new();
    if let Ok(url) = std::env::var("NOMINATIM_BASE_URL") {
        nominatim_config = nominatim_config.with_base_url(url);
    }
    let nominatim = NominatimClient::new(nominatim_config).expect("Failed to create Nominatim client");

    let cache_config = CacheConfig::default();
    let routes = CachedRouteProvider::new(osrm, &cache_config);
    let geocoder = CachedGeocoder::new(nominatim, &cache_config);

    // Spawn background task to reload prices daily
    let catalog_reload = catalog.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRICE_RELOAD_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            let catalog = catalog_reload.clone();
            let path = prices_path.clone();
            match tokio::task::spawn_blocking(move || catalog.reload_csv(&path)).await {
                Ok(Ok(summary)) => info!(
                    created = summary.created,
                    updated = summary.updated,
                    "reloaded fuel price sheet"
                ),
                Ok(Err(e)) => warn!(error = %e, "failed to reload fuel price sheet"),
                Err(e) => error!(error = %e, "price reload task panicked"),
            }
        }
    });

    // Build app state
    let state = AppState::new(routes, geocoder, catalog, PlannerConfig::default());

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .expect("BIND_ADDR must be a socket address");
    info!(%addr, "fuel route planner listening");
    info!("  GET  /health      - Health check");
    info!("  POST /route-plan  - Plan fuel stops for a trip");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
