//! Shared types for basewatch location change tracking.
//!
//! This crate holds the data model used by the store, the tracking core and
//! the HTTP service:
//!
//! - Detection payloads as produced by the external detector
//! - The per-location [`LocationRecord`] snapshot
//! - Change results and [`Insight`] messages
//! - The closed aircraft/vehicle classification
//! - [`ValidationError`] for rejected inputs
//!
//! # Example
//!
//! ```
//! use basewatch_types::{Detection, DetectionClass, DetectionPayload};
//!
//! let payload = DetectionPayload::new(vec![
//!     Detection::new("A3", [10.0, 10.0, 40.0, 40.0]),
//!     Detection::new("truck", [50.0, 50.0, 60.0, 60.0]),
//! ]);
//!
//! let aircraft = payload
//!     .detections
//!     .iter()
//!     .filter(|d| DetectionClass::classify(&d.class).is_aircraft())
//!     .count();
//! assert_eq!(aircraft, 1);
//! ```

pub mod class;
pub mod error;
pub mod insight;
pub mod types;

pub use class::{AircraftClass, DetectionClass};
pub use error::{ValidationError, ValidationResult};
pub use insight::{ChangeResult, ChangeSet, Insight, ProcessOutcome};
pub use types::{BoundingBox, Detection, DetectionPayload, LocationRecord, LocationStats};

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use time::OffsetDateTime;
    use time::macros::datetime;

    use super::*;

    fn record() -> LocationRecord {
        LocationRecord {
            location_id: "base_40.710_-74.010".to_string(),
            timestamp: datetime!(2024-05-01 12:00:00 UTC),
            aircraft_count: 2,
            vehicle_count: 1,
            aircraft_positions: vec![[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]],
            vehicle_positions: vec![[9.0, 10.0, 11.0, 12.0]],
            total_count: 3,
            category_breakdown: BTreeMap::from([("A1".to_string(), 2), ("truck".to_string(), 1)]),
        }
    }

    // --- Classification tests ---

    #[test]
    fn test_every_aircraft_code_is_aircraft() {
        for n in 1..=19 {
            let label = format!("A{}", n);
            assert!(
                DetectionClass::classify(&label).is_aircraft(),
                "{} should be an aircraft",
                label
            );
        }
    }

    #[test]
    fn test_unknown_labels_are_vehicles() {
        for label in ["A0", "A20", "a1", "A", "truck", "", " A1"] {
            assert_eq!(DetectionClass::classify(label), DetectionClass::OtherVehicle);
        }
    }

    #[test]
    fn test_aircraft_class_label_roundtrip() {
        for class in AircraftClass::ALL {
            assert_eq!(AircraftClass::from_label(class.label()), Some(class));
            assert_eq!(class.to_string(), class.label());
        }
    }

    #[test]
    fn test_aircraft_class_repr_values() {
        assert_eq!(AircraftClass::A1 as u8, 1);
        assert_eq!(AircraftClass::A19 as u8, 19);
    }

    // --- ChangeSet tests ---

    #[test]
    fn test_change_set_between() {
        let previous = record();
        let mut current = record();
        current.aircraft_count = 0;
        current.vehicle_count = 4;
        current.total_count = 10;

        let changes = ChangeSet::between(&previous, &current);
        assert_eq!(changes.aircraft_diff, -2);
        assert_eq!(changes.vehicle_diff, 3);
        assert_eq!(changes.total_diff, 7);
        assert!(!changes.is_zero());
    }

    #[test]
    fn test_change_set_identical_is_zero() {
        let changes = ChangeSet::between(&record(), &record());
        assert!(changes.is_zero());
    }

    // --- Insight tests ---

    #[test]
    fn test_insight_display() {
        assert_eq!(
            Insight::AircraftIncrease(3).to_string(),
            "Aircraft increase (+3): possible reinforcements or incoming mission detected."
        );
        assert!(Insight::VehicleDecrease(-2).to_string().contains("(-2)"));
        assert!(
            Insight::FirstScan {
                location_id: "base_1.000_2.000".to_string(),
                aircraft: 4,
                vehicles: 7,
            }
            .to_string()
            .contains("base_1.000_2.000")
        );
        assert!(
            Insight::NoSignificantChange
                .to_string()
                .starts_with("No significant changes")
        );
    }

    #[test]
    fn test_insight_serializes_as_message() {
        let json = serde_json::to_string(&Insight::Stable).unwrap();
        assert_eq!(json, format!("\"{}\"", Insight::Stable));
    }

    // --- Serialization tests ---

    #[test]
    fn test_location_record_serialization_roundtrip() {
        let original = record();
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("\"timestamp\":\"2024-05-01T12:00:00Z\""));

        let parsed: LocationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_location_record_accepts_legacy_field_names() {
        let json = r#"{
            "location_id": "base_1.000_2.000",
            "timestamp": "2024-01-01T00:00:00Z",
            "aircraft": 3,
            "vehicles": 4,
            "aircraft_positions": [[0, 0, 1, 1]],
            "vehicle_positions": [],
            "total_vehicles": 7,
            "vehicle_counts": {"A1": 3}
        }"#;

        let parsed: LocationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.aircraft_count, 3);
        assert_eq!(parsed.vehicle_count, 4);
        assert_eq!(parsed.total_count, 7);
        assert_eq!(parsed.category_breakdown.get("A1"), Some(&3));
        assert_eq!(parsed.aircraft_positions, vec![[0.0, 0.0, 1.0, 1.0]]);
    }

    #[test]
    fn test_payload_deserialization_with_detector_aliases() {
        let json = r#"{
            "detections": [
                {"class": "A2", "bbox": [1, 2, 3, 4], "confidence": 0.9},
                {"class": "truck", "bbox": [5, 6, 7, 8]}
            ],
            "total_vehicles": 2,
            "vehicle_counts": {"A2": 1}
        }"#;

        let payload: DetectionPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.detections.len(), 2);
        assert_eq!(payload.detections[0].confidence, Some(0.9));
        assert_eq!(payload.detections[1].confidence, None);
        assert_eq!(payload.total_count, Some(2));
        assert_eq!(payload.category_breakdown.unwrap().get("A2"), Some(&1));
    }

    #[test]
    fn test_payload_missing_detections_is_rejected() {
        let result = serde_json::from_str::<DetectionPayload>(r#"{"total_count": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_process_outcome_serializes_flat() {
        let current = record();
        let outcome = ProcessOutcome {
            result: ChangeResult {
                changes: None,
                insights: vec![Insight::NoSignificantChange],
                is_first_scan: true,
                timestamp: OffsetDateTime::UNIX_EPOCH,
            },
            location_id: current.location_id.clone(),
            current_record: current,
        };

        let json: serde_json::Value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["is_first_scan"], true);
        assert!(json["changes"].is_null());
        assert!(json["insights"][0].is_string());
        assert_eq!(json["location_id"], "base_40.710_-74.010");
        assert_eq!(json["current_record"]["aircraft_count"], 2);
        assert_eq!(json["timestamp"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_stats_serialization_with_no_scans() {
        let stats = LocationStats {
            total_locations: 0,
            total_scans: 0,
            latest_scan: None,
        };
        let json: serde_json::Value = serde_json::to_value(&stats).unwrap();
        assert!(json["latest_scan"].is_null());
    }

    // --- ValidationError tests ---

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::InvalidRadius(0.0).to_string(),
            "invalid zone radius 0: must be a finite number greater than zero"
        );
        assert_eq!(
            ValidationError::EmptyClassLabel { index: 2 }.to_string(),
            "detection 2 has an empty class label"
        );
    }
}
