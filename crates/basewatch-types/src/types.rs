//! Detection payloads and persisted location records.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Axis-aligned bounding box as emitted by the detector: `[x1, y1, x2, y2]`.
pub type BoundingBox = [f64; 4];

/// One detection produced by the external detector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Detection {
    /// Detector class label (for example `"A3"` or `"truck"`).
    pub class: String,
    /// Bounding box in image pixel coordinates.
    pub bbox: BoundingBox,
    /// Detector confidence in `0.0..=1.0`, if reported.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub confidence: Option<f64>,
}

impl Detection {
    /// Create a detection without a confidence score.
    pub fn new(class: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            class: class.into(),
            bbox,
            confidence: None,
        }
    }
}

/// The result of one detector run, as handed to the tracker.
///
/// `total_count` and `category_breakdown` are caller-supplied aggregates and
/// are stored as-is. The detector's own field names (`total_vehicles`,
/// `vehicle_counts`) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectionPayload {
    /// Detections in emission order.
    pub detections: Vec<Detection>,
    /// Aggregate count reported by the detector.
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "total_vehicles", skip_serializing_if = "Option::is_none")
    )]
    pub total_count: Option<u64>,
    /// Per-class counts reported by the detector.
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "vehicle_counts", skip_serializing_if = "Option::is_none")
    )]
    pub category_breakdown: Option<BTreeMap<String, u64>>,
}

impl DetectionPayload {
    /// Create a payload from a list of detections.
    pub fn new(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            ..Default::default()
        }
    }

    /// Set the caller-supplied aggregate count.
    #[must_use]
    pub fn with_total_count(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }

    /// Set the caller-supplied per-class breakdown.
    #[must_use]
    pub fn with_breakdown(mut self, breakdown: BTreeMap<String, u64>) -> Self {
        self.category_breakdown = Some(breakdown);
        self
    }
}

/// The latest snapshot stored for one location.
///
/// Exactly one record exists per `location_id`; a new scan overwrites the
/// previous one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationRecord {
    /// Zone identifier, e.g. `base_40.710_-74.010`.
    pub location_id: String,
    /// When the snapshot was captured.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
    /// Number of aircraft detections.
    #[cfg_attr(feature = "serde", serde(alias = "aircraft"))]
    pub aircraft_count: u64,
    /// Number of non-aircraft vehicle detections.
    #[cfg_attr(feature = "serde", serde(alias = "vehicles"))]
    pub vehicle_count: u64,
    /// Aircraft bounding boxes in detector order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub aircraft_positions: Vec<BoundingBox>,
    /// Vehicle bounding boxes in detector order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub vehicle_positions: Vec<BoundingBox>,
    /// Caller-supplied aggregate; not reconciled with the bucket counts.
    #[cfg_attr(feature = "serde", serde(default, alias = "total_vehicles"))]
    pub total_count: u64,
    /// Caller-supplied per-class counts.
    #[cfg_attr(feature = "serde", serde(default, alias = "vehicle_counts"))]
    pub category_breakdown: BTreeMap<String, u64>,
}

/// Aggregate figures over every stored location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationStats {
    /// Number of known locations.
    pub total_locations: usize,
    /// Number of scans on record. Only the latest snapshot per location is
    /// kept, so this equals `total_locations`.
    pub total_scans: usize,
    /// Most recent capture time across all records.
    #[cfg_attr(feature = "serde", serde(default, with = "time::serde::rfc3339::option"))]
    pub latest_scan: Option<OffsetDateTime>,
}
