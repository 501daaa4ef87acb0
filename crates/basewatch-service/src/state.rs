//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use basewatch_core::LocationTracker;

use crate::config::{Config, ConfigError, FieldError};

/// Shared application state.
pub struct AppState {
    /// The tracker and its store.
    ///
    /// Every request that touches the store holds this lock for its whole
    /// lookup, diff and persist sequence, so scans of the same location
    /// are applied one at a time.
    pub tracker: Mutex<LocationTracker>,
    /// Configuration the service was started with.
    pub config: Config,
}

impl AppState {
    /// Create new application state around an existing tracker.
    pub fn new(tracker: LocationTracker, config: Config) -> Arc<Self> {
        Arc::new(Self {
            tracker: Mutex::new(tracker),
            config,
        })
    }

    /// Open the configured store and build the tracker from `config`.
    pub fn from_config(config: Config) -> Result<Arc<Self>, StartupError> {
        let zone = config.tracking.zone().map_err(|e| {
            StartupError::Config(ConfigError::Validation(vec![FieldError {
                field: "tracking.zone_radius".to_string(),
                message: e.to_string(),
            }]))
        })?;
        let store = config.storage.open()?;

        let tracker = LocationTracker::new(store)
            .with_zone(zone)
            .with_thresholds(config.tracking.thresholds);

        Ok(Self::new(tracker, config))
    }
}

/// Errors raised while building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to open store: {0}")]
    Store(#[from] basewatch_store::Error),
}
