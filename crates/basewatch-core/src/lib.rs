//! Location change tracking for satellite detection scans.
//!
//! This crate turns successive detector runs over the same geographic area
//! into change reports:
//!
//! - [`zone`]: snap coordinates to a grid and name the cell
//! - [`ingest`]: split detections into aircraft and other vehicles
//! - [`insights`]: compare two snapshots and describe the change
//! - [`LocationTracker`]: the scan pipeline over a [`LocationStore`]
//! - [`history`]: read-only queries over the store
//!
//! # Example
//!
//! ```
//! use basewatch_core::{LocationTracker, LocationStore};
//! use basewatch_types::{Detection, DetectionPayload};
//!
//! let store = LocationStore::open_in_memory().unwrap();
//! let mut tracker = LocationTracker::new(store);
//!
//! let payload = DetectionPayload::new(vec![
//!     Detection::new("A5", [100.0, 100.0, 140.0, 130.0]),
//!     Detection::new("truck", [10.0, 10.0, 20.0, 18.0]),
//! ]);
//!
//! let outcome = tracker
//!     .process_at(40.7128, -74.0060, "2024-06-01T12:00:00Z", &payload)
//!     .unwrap();
//!
//! assert!(outcome.result.is_first_scan);
//! assert_eq!(outcome.location_id, "base_40.710_-74.010");
//! ```

pub mod error;
pub mod history;
pub mod ingest;
pub mod insights;
pub mod tracker;
pub mod zone;

pub use error::{Error, Result};
pub use insights::InsightThresholds;
pub use tracker::LocationTracker;
pub use zone::{DEFAULT_ZONE_RADIUS, ZoneGrid, generate_location_id};

// Re-export the pieces callers need alongside the tracker
pub use basewatch_store::{JsonFileBackend, LocationStore, SqliteBackend, StorageBackend};
pub use basewatch_types::{
    ChangeResult, ChangeSet, Detection, DetectionPayload, Insight, LocationRecord, LocationStats,
    ProcessOutcome, ValidationError,
};
