//! Per-location change tracking.
//!
//! [`LocationTracker`] owns the store and runs the full scan pipeline:
//! validate and ingest the payload, compare it with the previous snapshot,
//! derive insights, then persist the new snapshot.

use time::OffsetDateTime;
use tracing::{debug, info};

use basewatch_store::LocationStore;
use basewatch_types::{
    ChangeResult, ChangeSet, DetectionPayload, Insight, LocationRecord, LocationStats,
    ProcessOutcome,
};

use crate::error::Result;
use crate::history;
use crate::ingest::{ingest, parse_timestamp};
use crate::insights::InsightThresholds;
use crate::zone::ZoneGrid;

/// Tracks detection counts per location across scans.
///
/// Processing takes `&mut self`; callers sharing a tracker between tasks
/// hold it behind a single lock so that lookup, diff and persist happen as
/// one step.
pub struct LocationTracker {
    store: LocationStore,
    thresholds: InsightThresholds,
    zone: ZoneGrid,
}

impl LocationTracker {
    /// Create a tracker with default thresholds and zone size.
    pub fn new(store: LocationStore) -> Self {
        Self {
            store,
            thresholds: InsightThresholds::default(),
            zone: ZoneGrid::default(),
        }
    }

    /// Replace the insight thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: InsightThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replace the zone grid used by [`process_at`](Self::process_at).
    #[must_use]
    pub fn with_zone(mut self, zone: ZoneGrid) -> Self {
        self.zone = zone;
        self
    }

    /// The insight thresholds in use.
    pub fn thresholds(&self) -> &InsightThresholds {
        &self.thresholds
    }

    /// The zone grid in use.
    pub fn zone(&self) -> ZoneGrid {
        self.zone
    }

    /// The underlying store.
    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    /// Process one detector run for a location.
    ///
    /// `timestamp` must be RFC 3339. Invalid input is rejected before the
    /// store is read or written. The new snapshot always replaces the stored
    /// one; if that write fails the error is returned and the previous
    /// snapshot stays in place.
    pub fn process_detection(
        &mut self,
        location_id: &str,
        timestamp: &str,
        payload: &DetectionPayload,
    ) -> Result<ProcessOutcome> {
        let timestamp = parse_timestamp(timestamp)?;
        self.process_scan(location_id, timestamp, payload)
    }

    /// Like [`process_detection`](Self::process_detection) with an already
    /// parsed timestamp.
    pub fn process_scan(
        &mut self,
        location_id: &str,
        timestamp: OffsetDateTime,
        payload: &DetectionPayload,
    ) -> Result<ProcessOutcome> {
        let current = ingest(location_id, timestamp, payload)?;

        let result = match self.store.get(location_id) {
            None => {
                info!(
                    "First scan of {}: {} aircraft, {} vehicles",
                    location_id, current.aircraft_count, current.vehicle_count
                );
                ChangeResult {
                    changes: None,
                    insights: vec![Insight::FirstScan {
                        location_id: location_id.to_string(),
                        aircraft: current.aircraft_count,
                        vehicles: current.vehicle_count,
                    }],
                    is_first_scan: true,
                    timestamp,
                }
            }
            Some(previous) => {
                let changes = ChangeSet::between(previous, &current);
                let insights = self.thresholds.evaluate(previous, &current, &changes);
                debug!(
                    "Scan of {}: aircraft {:+}, vehicles {:+}, total {:+} ({} insights)",
                    location_id,
                    changes.aircraft_diff,
                    changes.vehicle_diff,
                    changes.total_diff,
                    insights.len()
                );
                ChangeResult {
                    changes: Some(changes),
                    insights,
                    is_first_scan: false,
                    timestamp,
                }
            }
        };

        self.store.put(current.clone())?;
        debug!("Insights for {}: {}", location_id, result.messages().join(" | "));

        Ok(ProcessOutcome {
            result,
            current_record: current,
            location_id: location_id.to_string(),
        })
    }

    /// Key raw coordinates with this tracker's zone grid, then process the
    /// scan under the resulting location id.
    pub fn process_at(
        &mut self,
        lat: f64,
        lng: f64,
        timestamp: &str,
        payload: &DetectionPayload,
    ) -> Result<ProcessOutcome> {
        let timestamp = parse_timestamp(timestamp)?;
        let location_id = self.zone.location_id(lat, lng)?;
        self.process_scan(&location_id, timestamp, payload)
    }

    /// The latest snapshot for a location, or `None` if never scanned.
    pub fn get_location_history(&self, location_id: &str) -> Option<&LocationRecord> {
        history::get_location_history(&self.store, location_id)
    }

    /// Every known location id, in ascending order.
    pub fn get_all_locations(&self) -> Vec<String> {
        history::get_all_locations(&self.store)
    }

    /// Aggregate figures over all locations.
    pub fn get_location_stats(&self) -> LocationStats {
        history::get_location_stats(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use basewatch_types::{Detection, ValidationError};

    use super::*;
    use crate::error::Error;

    fn tracker() -> LocationTracker {
        LocationTracker::new(LocationStore::open_in_memory().unwrap())
    }

    fn payload(aircraft: usize, vehicles: usize) -> DetectionPayload {
        let mut detections = Vec::new();
        for i in 0..aircraft {
            detections.push(Detection::new("A2", [i as f64, 0.0, i as f64 + 5.0, 5.0]));
        }
        for i in 0..vehicles {
            detections.push(Detection::new("truck", [0.0, i as f64, 3.0, i as f64 + 3.0]));
        }
        DetectionPayload::new(detections)
    }

    #[test]
    fn test_first_scan() {
        let mut tracker = tracker();
        let outcome = tracker
            .process_detection("base_1.000_2.000", "2024-01-01T00:00:00Z", &payload(2, 3))
            .unwrap();

        assert!(outcome.result.is_first_scan);
        assert!(outcome.result.changes.is_none());
        assert_eq!(
            outcome.result.insights,
            vec![Insight::FirstScan {
                location_id: "base_1.000_2.000".to_string(),
                aircraft: 2,
                vehicles: 3,
            }]
        );
        assert_eq!(outcome.location_id, "base_1.000_2.000");
        assert_eq!(
            tracker.get_location_history("base_1.000_2.000"),
            Some(&outcome.current_record)
        );
    }

    #[test]
    fn test_follow_up_scan_diffs_against_previous() {
        let mut tracker = tracker();
        tracker
            .process_detection("loc", "2024-01-01T00:00:00Z", &payload(4, 10))
            .unwrap();
        let outcome = tracker
            .process_detection("loc", "2024-01-02T00:00:00Z", &payload(5, 11))
            .unwrap();

        assert!(!outcome.result.is_first_scan);
        assert_eq!(
            outcome.result.changes,
            Some(ChangeSet {
                aircraft_diff: 1,
                vehicle_diff: 1,
                total_diff: 0
            })
        );
        assert!(outcome.result.insights.contains(&Insight::Stable));
    }

    #[test]
    fn test_repeat_scan_has_zero_diff() {
        let mut tracker = tracker();
        tracker
            .process_detection("loc", "2024-01-01T00:00:00Z", &payload(3, 3))
            .unwrap();
        let outcome = tracker
            .process_detection("loc", "2024-01-01T00:00:00Z", &payload(3, 3))
            .unwrap();

        assert!(!outcome.result.is_first_scan);
        assert!(outcome.result.changes.unwrap().is_zero());
        assert_eq!(outcome.result.insights, vec![Insight::NoSignificantChange]);
    }

    #[test]
    fn test_invalid_input_leaves_store_untouched() {
        let mut tracker = tracker();
        tracker
            .process_detection("loc", "2024-01-01T00:00:00Z", &payload(1, 1))
            .unwrap();
        let before = tracker.get_location_history("loc").cloned();

        let bad_time = tracker.process_detection("loc", "not a time", &payload(9, 9));
        assert!(matches!(
            bad_time,
            Err(Error::Validation(ValidationError::InvalidTimestamp { .. }))
        ));

        let bad_payload = DetectionPayload::new(vec![Detection::new("", [0.0; 4])]);
        assert!(matches!(
            tracker.process_detection("loc", "2024-01-02T00:00:00Z", &bad_payload),
            Err(Error::Validation(ValidationError::EmptyClassLabel { index: 0 }))
        ));

        assert!(matches!(
            tracker.process_detection("", "2024-01-02T00:00:00Z", &payload(1, 1)),
            Err(Error::Validation(ValidationError::EmptyLocationId))
        ));

        assert_eq!(tracker.get_location_history("loc").cloned(), before);
        assert_eq!(tracker.get_all_locations(), vec!["loc"]);
    }

    #[test]
    fn test_process_at_keys_coordinates() {
        let mut tracker = tracker();
        let first = tracker
            .process_at(40.7128, -74.0060, "2024-01-01T00:00:00Z", &payload(1, 0))
            .unwrap();
        let second = tracker
            .process_at(40.7131, -74.0062, "2024-01-01T01:00:00Z", &payload(1, 0))
            .unwrap();

        assert_eq!(first.location_id, "base_40.710_-74.010");
        assert_eq!(second.location_id, first.location_id);
        assert!(!second.result.is_first_scan);
    }

    #[test]
    fn test_process_at_uses_configured_zone() {
        let mut tracker = tracker().with_zone(ZoneGrid::new(1.0).unwrap());
        let outcome = tracker
            .process_at(40.7128, -74.0060, "2024-01-01T00:00:00Z", &payload(0, 0))
            .unwrap();
        assert_eq!(outcome.location_id, "base_41.000_-74.000");
    }

    #[test]
    fn test_process_at_rejects_bad_coordinates() {
        let mut tracker = tracker();
        assert!(matches!(
            tracker.process_at(120.0, 0.0, "2024-01-01T00:00:00Z", &payload(1, 0)),
            Err(Error::Validation(ValidationError::InvalidCoordinate { .. }))
        ));
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn test_custom_thresholds_apply() {
        let mut tracker = tracker().with_thresholds(InsightThresholds {
            significant_total: 0,
            ..Default::default()
        });
        tracker
            .process_detection(
                "loc",
                "2024-01-01T00:00:00Z",
                &payload(0, 0).with_total_count(1),
            )
            .unwrap();
        let outcome = tracker
            .process_detection(
                "loc",
                "2024-01-01T01:00:00Z",
                &payload(0, 0).with_total_count(2),
            )
            .unwrap();

        assert_eq!(outcome.result.insights, vec![Insight::SignificantIncrease]);
        assert_eq!(tracker.thresholds().significant_total, 0);
    }

    #[test]
    fn test_stats_follow_processing() {
        let mut tracker = tracker();
        tracker
            .process_detection("a", "2024-01-01T00:00:00Z", &payload(1, 0))
            .unwrap();
        tracker
            .process_detection("b", "2024-02-01T00:00:00Z", &payload(1, 0))
            .unwrap();
        tracker
            .process_detection("a", "2024-01-15T00:00:00Z", &payload(1, 0))
            .unwrap();

        let stats = tracker.get_location_stats();
        assert_eq!(stats.total_locations, 2);
        assert_eq!(stats.total_scans, 2);
        assert_eq!(
            stats.latest_scan,
            Some(parse_timestamp("2024-02-01T00:00:00Z").unwrap())
        );
    }
}
