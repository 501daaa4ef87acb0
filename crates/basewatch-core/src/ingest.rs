//! Turning a detector payload into a location snapshot.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use basewatch_types::{
    DetectionClass, DetectionPayload, LocationRecord, ValidationError, ValidationResult,
};

/// Parse an RFC 3339 capture timestamp.
pub fn parse_timestamp(value: &str) -> ValidationResult<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| ValidationError::InvalidTimestamp {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Check a payload without building anything from it.
///
/// Every detection needs a non-empty class label and a finite bounding box;
/// a confidence, when present, must lie in `0.0..=1.0`.
pub fn validate_payload(payload: &DetectionPayload) -> ValidationResult<()> {
    for (index, detection) in payload.detections.iter().enumerate() {
        if detection.class.trim().is_empty() {
            return Err(ValidationError::EmptyClassLabel { index });
        }
        if detection.bbox.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidBoundingBox { index });
        }
        if let Some(value) = detection.confidence
            && !(0.0..=1.0).contains(&value)
        {
            return Err(ValidationError::InvalidConfidence { index, value });
        }
    }
    Ok(())
}

/// Build the snapshot for one scan of `location_id`.
///
/// Detections are split into aircraft and other vehicles by class label,
/// keeping detector order within each bucket. The caller-supplied total and
/// breakdown are copied through unchanged; a missing total is stored as 0.
pub fn ingest(
    location_id: &str,
    timestamp: OffsetDateTime,
    payload: &DetectionPayload,
) -> ValidationResult<LocationRecord> {
    if location_id.trim().is_empty() {
        return Err(ValidationError::EmptyLocationId);
    }
    validate_payload(payload)?;

    let (aircraft, vehicles): (Vec<_>, Vec<_>) = payload
        .detections
        .iter()
        .partition(|d| DetectionClass::classify(&d.class).is_aircraft());

    Ok(LocationRecord {
        location_id: location_id.to_string(),
        timestamp,
        aircraft_count: aircraft.len() as u64,
        vehicle_count: vehicles.len() as u64,
        aircraft_positions: aircraft.iter().map(|d| d.bbox).collect(),
        vehicle_positions: vehicles.iter().map(|d| d.bbox).collect(),
        total_count: payload.total_count.unwrap_or(0),
        category_breakdown: payload.category_breakdown.clone().unwrap_or_default(),
    })
}
