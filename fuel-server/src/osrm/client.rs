//! OSRM HTTP client.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::GeoPoint;
use crate::provider::{ProviderError, RouteProvider, RouteSummary, body_excerpt};

use super::types::RouteResponse;

/// Default base URL: the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

const DEFAULT_USER_AGENT: &str = "fuel-route-api/1.0";

const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the OSRM server, without a trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    pub user_agent: String,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 90,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl OsrmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (self-hosted OSRM, or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// OSRM route service client.
///
/// Uses a semaphore to limit concurrent requests; the public server
/// rate limits aggressively.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl OsrmClient {
    /// Create a new OSRM client with the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, ProviderError> {
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

    /// URL of the driving route between two points, without query string.
    pub fn route_url(&self, origin: GeoPoint, destination: GeoPoint) -> String {
        // OSRM takes lon,lat pairs.
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, origin.lon, origin.lat, destination.lon, destination.lat
        )
    }

    /// Fetch the fastest driving route with full geometry.
    pub async fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Option<RouteSummary>, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Closed("OSRM"))?;

        let response = self
            .http
            .get(self.route_url(origin, destination))
            .query(&[
                ("overview", "full"),
                ("geometries", "polyline"),
                ("alternatives", "false"),
                ("steps", "false"),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("OSRM rate limited");
            return Ok(None);
        }

        let body = response.text().await?;
        route_from_body(status, &body)
    }
}

/// Interpret an OSRM route response that was not rate limited.
fn route_from_body(status: StatusCode, body: &str) -> Result<Option<RouteSummary>, ProviderError> {
    let parsed = serde_json::from_str::<RouteResponse>(body);

    // OSRM reports "no route" as a 400 with a JSON error code.
    if let Ok(parsed) = &parsed
        && parsed.is_no_route()
    {
        debug!(message = ?parsed.message, "OSRM found no route");
        return Ok(None);
    }

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider: "OSRM",
            status: status.as_u16(),
            message: body_excerpt(body),
        });
    }

    let parsed = parsed.map_err(|e| ProviderError::Json {
        provider: "OSRM",
        message: e.to_string(),
        body: Some(body_excerpt(body)),
    })?;

    if !parsed.is_ok() {
        return Err(ProviderError::Status {
            provider: "OSRM",
            status: status.as_u16(),
            message: format!(
                "{}: {}",
                parsed.code,
                parsed.message.as_deref().unwrap_or_default()
            ),
        });
    }

    Ok(parsed.into_summary())
}

impl RouteProvider for OsrmClient {
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> BoxFuture<'_, Result<Option<RouteSummary>, ProviderError>> {
        self.fetch_route(origin, destination).boxed()
    }
}
