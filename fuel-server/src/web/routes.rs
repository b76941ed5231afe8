//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::GeoPoint;
use crate::planner::{PlanError, PlanRequest, Planner};
use crate::provider::{Geocoder, ProviderError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route-plan", post(plan_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Which end of the trip is being resolved.
#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// Request field holding coordinates for this end, also used as its name.
    fn latlng_field(self) -> &'static str {
        match self {
            Endpoint::Start => "start_latlng",
            Endpoint::End => "end_latlng",
        }
    }

    fn not_found(self) -> AppError {
        let code = match self {
            Endpoint::Start => "START_NOT_FOUND_OR_NOT_US",
            Endpoint::End => "END_NOT_FOUND_OR_NOT_US",
        };
        AppError::BadRequest {
            code,
            message: None,
            hint: Some(format!(
                "Provide {} to avoid geocoding.",
                self.latlng_field()
            )),
        }
    }
}

/// Resolve one end of the trip, geocoding only when no coordinates are given.
async fn resolve_endpoint(
    geocoder: &dyn Geocoder,
    endpoint: Endpoint,
    latlng: Option<GeoPoint>,
    text: Option<&str>,
) -> Result<PlaceResult, AppError> {
    if let Some(point) = latlng {
        return Ok(PlaceResult::new(endpoint.latlng_field(), point));
    }

    let text = text.unwrap_or_default();
    match geocoder.geocode(text).await? {
        Some(place) => Ok(PlaceResult::new(place.name, place.point)),
        None => Err(endpoint.not_found()),
    }
}

/// Plan fuel stops between two places.
async fn plan_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanRouteResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PlanRouteRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(
            error = %e,
            body = %String::from_utf8_lossy(&body),
            "invalid plan request"
        );
        AppError::invalid_request(format!("Invalid JSON: {e}"))
    })?;
    req.validate().map_err(AppError::invalid_request)?;

    // Reject bad vehicles before spending upstream calls on them.
    let vehicle = req.vehicle();
    vehicle.validate()?;

    let geocoder = state.geocoder.as_ref();
    let (origin, destination) = futures::try_join!(
        resolve_endpoint(
            geocoder,
            Endpoint::Start,
            req.start_latlng,
            req.start.as_deref()
        ),
        resolve_endpoint(geocoder, Endpoint::End, req.end_latlng, req.end.as_deref()),
    )?;

    let route = state
        .routes
        .route(origin.point(), destination.point())
        .await?
        .ok_or_else(|| AppError::bad_request("ROUTE_NOT_FOUND_OR_RATE_LIMIT"))?;

    let request = PlanRequest::new(
        origin.point(),
        route.encoded_polyline.clone(),
        req.corridor_miles,
        vehicle,
    );
    let outcome = Planner::new(state.catalog.as_ref(), &state.config).plan(&request)?;

    info!(
        origin = %origin.name,
        destination = %destination.name,
        miles = outcome.total_miles,
        stops = outcome.plan.stops.len(),
        cost = outcome.plan.total_cost,
        "planned route"
    );

    Ok(Json(PlanRouteResponse::new(
        origin,
        destination,
        route,
        vehicle,
        outcome,
    )))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The request cannot be served as given
    BadRequest {
        code: &'static str,
        message: Option<String>,
        hint: Option<String>,
    },

    /// Planning failed
    Plan(PlanError),

    /// A routing or geocoding service failed
    Upstream { message: String },
}

impl AppError {
    fn bad_request(code: &'static str) -> Self {
        AppError::BadRequest {
            code,
            message: None,
            hint: None,
        }
    }

    fn invalid_request(message: String) -> Self {
        AppError::BadRequest {
            code: "INVALID_REQUEST",
            message: Some(message),
            hint: None,
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        AppError::Plan(e)
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest {
                code,
                message,
                hint,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message,
                    hint,
                    ..ErrorResponse::new(code)
                },
            ),
            AppError::Plan(e) => {
                let mut body = ErrorResponse::new(e.code());
                let status = match &e {
                    PlanError::Catalog(_) => StatusCode::SERVICE_UNAVAILABLE,
                    PlanError::NoFeasiblePlan { gap_miles } => {
                        body.gap_miles = Some(*gap_miles);
                        StatusCode::BAD_REQUEST
                    }
                    PlanError::InvalidVehicle(message) => {
                        body.message = Some(message.clone());
                        StatusCode::BAD_REQUEST
                    }
                    _ => StatusCode::BAD_REQUEST,
                };
                if status.is_server_error() {
                    error!(error = %e, "planning failed");
                } else {
                    warn!(error = %e, "planning rejected");
                }
                (status, body)
            }
            AppError::Upstream { message } => {
                error!(error = %message, "upstream failure");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        message: Some(message),
                        ..ErrorResponse::new("UPSTREAM_UNAVAILABLE")
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
