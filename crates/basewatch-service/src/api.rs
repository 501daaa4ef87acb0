//! REST API endpoints for the basewatch service.
//!
//! # Concurrency
//!
//! Handlers that read or write locations take `state.tracker` for the whole
//! request. A scan's lookup, diff and persist therefore run as one step and
//! concurrent scans are applied in arrival order.
//!
//! # Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]: invalid
//! input is 400, an unknown location is 404 and a failed write is 500.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use basewatch_core::ingest::parse_timestamp;
use basewatch_core::{
    DetectionPayload, LocationRecord, LocationStats, ProcessOutcome, ValidationError, ZoneGrid,
};

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/detections", post(process_coordinates))
        .route("/api/locations", get(list_locations))
        .route("/api/locations/{id}", get(get_location))
        .route("/api/locations/{id}/detections", post(process_location))
        .route("/api/stats", get(get_stats))
        .route("/api/zone", get(get_zone))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Body for a scan of a known location.
#[derive(Debug, Deserialize)]
pub struct DetectionRequest {
    /// RFC 3339 capture time; defaults to the time of the request.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub payload: DetectionPayload,
}

/// Body for a scan identified by raw coordinates.
#[derive(Debug, Deserialize)]
pub struct CoordinateDetectionRequest {
    pub lat: f64,
    pub lng: f64,
    /// Zone cell size; defaults to the configured radius.
    #[serde(default)]
    pub radius: Option<f64>,
    /// RFC 3339 capture time; defaults to the time of the request.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub payload: DetectionPayload,
}

fn capture_time(timestamp: Option<&str>) -> Result<OffsetDateTime, ValidationError> {
    match timestamp {
        Some(value) => parse_timestamp(value),
        None => Ok(OffsetDateTime::now_utc()),
    }
}

/// Process a scan for a location id chosen by the caller.
async fn process_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<DetectionRequest>, JsonRejection>,
) -> Result<Json<ProcessOutcome>, AppError> {
    let Json(request) = body?;
    let timestamp = capture_time(request.timestamp.as_deref())?;

    let mut tracker = state.tracker.lock().await;
    let outcome = tracker.process_scan(&id, timestamp, &request.payload)?;
    log_outcome(&outcome);
    Ok(Json(outcome))
}

/// Process a scan keyed by coordinates.
async fn process_coordinates(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CoordinateDetectionRequest>, JsonRejection>,
) -> Result<Json<ProcessOutcome>, AppError> {
    let Json(request) = body?;
    let timestamp = capture_time(request.timestamp.as_deref())?;

    let mut tracker = state.tracker.lock().await;
    let zone = match request.radius {
        Some(radius) => ZoneGrid::new(radius)?,
        None => tracker.zone(),
    };
    let location_id = zone.location_id(request.lat, request.lng)?;

    let outcome = tracker.process_scan(&location_id, timestamp, &request.payload)?;
    log_outcome(&outcome);
    Ok(Json(outcome))
}

fn log_outcome(outcome: &ProcessOutcome) {
    info!(
        "Processed scan of {} (first scan: {}, {} insights)",
        outcome.location_id,
        outcome.result.is_first_scan,
        outcome.result.insights.len()
    );
}

/// List every known location id.
async fn list_locations(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.get_all_locations())
}

/// Get the latest snapshot for a location.
async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LocationRecord>, AppError> {
    let tracker = state.tracker.lock().await;
    let record = tracker
        .get_location_history(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Location not found: {}", id)))?;
    Ok(Json(record))
}

/// Aggregate figures over all locations.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<LocationStats> {
    let tracker = state.tracker.lock().await;
    Json(tracker.get_location_stats())
}

/// Query parameters for zone lookup.
#[derive(Debug, Deserialize)]
pub struct ZoneQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<f64>,
}

/// Zone lookup response.
#[derive(Debug, Serialize)]
pub struct ZoneResponse {
    pub location_id: String,
    pub radius: f64,
}

/// Resolve coordinates to a location id without recording anything.
async fn get_zone(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ZoneQuery>, QueryRejection>,
) -> Result<Json<ZoneResponse>, AppError> {
    let Query(query) = query?;
    let zone = match query.radius {
        Some(radius) => ZoneGrid::new(radius)?,
        None => state.tracker.lock().await.zone(),
    };

    Ok(Json(ZoneResponse {
        location_id: zone.location_id(query.lat, query.lng)?,
        radius: zone.radius(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Store(basewatch_store::Error),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<basewatch_core::Error> for AppError {
    fn from(e: basewatch_core::Error) -> Self {
        match e {
            basewatch_core::Error::Validation(e) => e.into(),
            basewatch_core::Error::Store(e) => AppError::Store(e),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Store(e) => {
                warn!("Store write failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
