//! HTTP REST API for basewatch location change tracking.
//!
//! This crate wraps a [`LocationTracker`](basewatch_core::LocationTracker)
//! in an axum service. Each posted scan is compared with the last scan of
//! the same zone and the change report is returned as JSON.
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `POST /api/locations/{id}/detections` - Process a scan for a location id
//! - `POST /api/detections` - Process a scan keyed by `lat`/`lng`
//! - `GET /api/locations` - List known location ids
//! - `GET /api/locations/{id}` - Latest snapshot for a location
//! - `GET /api/stats` - Location count and most recent scan time
//! - `GET /api/zone?lat=..&lng=..` - Resolve coordinates to a location id
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/basewatch/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [storage]
//! backend = "json"   # or "sqlite"
//! path = "~/.local/share/basewatch/base_records.json"
//!
//! [tracking]
//! zone_radius = 0.01
//!
//! [tracking.thresholds]
//! significant_total = 5
//! stable_aircraft = 1
//! stable_vehicle = 2
//! ```

pub mod api;
pub mod config;
pub mod state;

pub use config::{
    Config, ConfigError, FieldError, ServerConfig, StorageConfig, StorageKind, TrackingConfig,
    default_config_path,
};
pub use state::{AppState, StartupError};
