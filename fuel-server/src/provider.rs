//! Routing and geocoding collaborators.
//!
//! The web layer talks to these traits rather than to concrete HTTP
//! clients, so handlers can be exercised against in-process stubs and the
//! caching wrappers can be stacked on any implementation.

use futures::future::BoxFuture;

use crate::domain::GeoPoint;

/// A driving route between two points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    /// Route length, truncated to whole meters.
    pub distance_meters: u64,

    /// Travel time formatted as whole seconds, e.g. `"3600s"`.
    pub duration: String,

    /// Route geometry as an encoded polyline (precision 1e5).
    pub encoded_polyline: String,
}

/// A geocoded place inside the United States.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub point: GeoPoint,

    /// Display name, or the query text when the geocoder gave none.
    pub name: String,
}

/// Computes driving routes.
///
/// `Ok(None)` means no route could be produced right now: the provider
/// found nothing or asked us to back off.
pub trait RouteProvider: Send + Sync {
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> BoxFuture<'_, Result<Option<RouteSummary>, ProviderError>>;
}

/// Resolves free text to a US location.
///
/// `Ok(None)` means no match, a match outside the US, or rate limiting.
pub trait Geocoder: Send + Sync {
    fn geocode<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Option<GeocodedPlace>, ProviderError>>;
}

/// Errors from an upstream HTTP provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an unexpected status code
    #[error("{provider} returned {status}: {message}")]
    Status {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Response body could not be parsed
    #[error("{provider} response parse error: {message}")]
    Json {
        provider: &'static str,
        message: String,
        body: Option<String>,
    },

    /// Client is shutting down
    #[error("{0} client is closed")]
    Closed(&'static str),
}

/// First 500 characters of a response body, for error reports.
pub(crate) fn body_excerpt(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProviderError::Status {
            provider: "OSRM",
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "OSRM returned 503: Service Unavailable");

        let err = ProviderError::Json {
            provider: "Nominatim",
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(
            err.to_string(),
            "Nominatim response parse error: expected value"
        );

        assert_eq!(
            ProviderError::Closed("OSRM").to_string(),
            "OSRM client is closed"
        );
    }

    #[test]
    fn excerpt_truncates() {
        let body = "x".repeat(800);
        assert_eq!(body_excerpt(&body).len(), 500);
        assert_eq!(body_excerpt("short"), "short");
    }
}
