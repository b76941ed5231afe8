//! Nominatim HTTP client.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::GeoPoint;
use crate::provider::{GeocodedPlace, Geocoder, ProviderError, body_excerpt};

use super::types::SearchResult;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const DEFAULT_USER_AGENT: &str = "fuel-route-api/1.0";

/// Nominatim's usage policy allows one request per second per client.
const DEFAULT_MAX_CONCURRENT: usize = 1;

const US_LAT_MIN: f64 = 18.0;
const US_LAT_MAX: f64 = 72.0;
const US_LON_MIN: f64 = -170.0;
const US_LON_MAX: f64 = -50.0;

/// Whether a position lies in the box covering the US states and territories.
pub fn in_us_bounds(point: GeoPoint) -> bool {
    (US_LAT_MIN..=US_LAT_MAX).contains(&point.lat)
        && (US_LON_MIN..=US_LON_MAX).contains(&point.lon)
}

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim server, without a trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Nominatim rejects requests without an identifying user agent
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl NominatimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Nominatim search client, restricted to US results.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Look up the best US match for `query`.
    pub async fn search(&self, query: &str) -> Result<Option<GeocodedPlace>, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Closed("Nominatim"))?;

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("limit", "1"),
                ("countrycodes", "us"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Nominatim rate limited");
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: "Nominatim",
                status: status.as_u16(),
                message: body_excerpt(&body),
            });
        }

        let body = response.text().await?;
        let hits: Vec<SearchResult> =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                provider: "Nominatim",
                message: e.to_string(),
                body: Some(body_excerpt(&body)),
            })?;

        place_from_hits(query, hits)
    }
}

/// The first hit as a place, if it lies in the US.
fn place_from_hits(
    query: &str,
    hits: Vec<SearchResult>,
) -> Result<Option<GeocodedPlace>, ProviderError> {
    let Some(hit) = hits.into_iter().next() else {
        debug!(query, "no geocoding match");
        return Ok(None);
    };

    let (lat, lon) = hit.coordinates().ok_or_else(|| ProviderError::Json {
        provider: "Nominatim",
        message: format!("invalid coordinates {:?}, {:?}", hit.lat, hit.lon),
        body: None,
    })?;

    let point = GeoPoint::new(lat, lon);
    if !in_us_bounds(point) {
        debug!(query, lat, lon, "geocoding match outside the US");
        return Ok(None);
    }

    let name = hit
        .display_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| query.to_string());

    Ok(Some(GeocodedPlace { point, name }))
}

impl Geocoder for NominatimClient {
    fn geocode<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Option<GeocodedPlace>, ProviderError>> {
        self.search(query).boxed()
    }
}
