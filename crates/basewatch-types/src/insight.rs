//! Change results and insight messages.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::LocationRecord;

/// Signed count deltas between two snapshots of the same location,
/// always `current - previous`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChangeSet {
    /// Change in aircraft count.
    pub aircraft_diff: i64,
    /// Change in vehicle count.
    pub vehicle_diff: i64,
    /// Change in the caller-supplied total.
    pub total_diff: i64,
}

impl ChangeSet {
    /// Compute the deltas from `previous` to `current`.
    ///
    /// ```
    /// # use basewatch_types::{ChangeSet, LocationRecord};
    /// # fn record(aircraft: u64, vehicles: u64, total: u64) -> LocationRecord {
    /// #     LocationRecord {
    /// #         location_id: "base_0.000_0.000".into(),
    /// #         timestamp: time::OffsetDateTime::UNIX_EPOCH,
    /// #         aircraft_count: aircraft,
    /// #         vehicle_count: vehicles,
    /// #         aircraft_positions: vec![],
    /// #         vehicle_positions: vec![],
    /// #         total_count: total,
    /// #         category_breakdown: Default::default(),
    /// #     }
    /// # }
    /// let changes = ChangeSet::between(&record(5, 10, 15), &record(8, 7, 15));
    /// assert_eq!(changes.aircraft_diff, 3);
    /// assert_eq!(changes.vehicle_diff, -3);
    /// assert_eq!(changes.total_diff, 0);
    /// ```
    #[must_use]
    pub fn between(previous: &LocationRecord, current: &LocationRecord) -> Self {
        Self {
            aircraft_diff: delta(previous.aircraft_count, current.aircraft_count),
            vehicle_diff: delta(previous.vehicle_count, current.vehicle_count),
            total_diff: delta(previous.total_count, current.total_count),
        }
    }

    /// Whether every delta is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.aircraft_diff == 0 && self.vehicle_diff == 0 && self.total_diff == 0
    }
}

fn delta(previous: u64, current: u64) -> i64 {
    let previous = i64::try_from(previous).unwrap_or(i64::MAX);
    let current = i64::try_from(current).unwrap_or(i64::MAX);
    current.saturating_sub(previous)
}

/// One observation about how a location changed between scans.
///
/// Each variant renders to a single human-readable sentence via `Display`,
/// and serializes as that sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Insight {
    /// No previous record existed; the scan becomes the baseline.
    FirstScan {
        location_id: String,
        aircraft: u64,
        vehicles: u64,
    },
    /// More aircraft than last time (positive delta).
    AircraftIncrease(i64),
    /// Fewer aircraft than last time (negative delta).
    AircraftDecrease(i64),
    /// More vehicles than last time (positive delta).
    VehicleIncrease(i64),
    /// Fewer vehicles than last time (negative delta).
    VehicleDecrease(i64),
    /// The total rose by more than the significance threshold.
    SignificantIncrease,
    /// The total fell by more than the significance threshold.
    SignificantDecrease,
    /// Aircraft and vehicle deltas are both within the stability band.
    Stable,
    /// The number of aircraft positions changed.
    AircraftRepositioned { from: usize, to: usize },
    /// The number of vehicle positions changed.
    VehicleRepositioned { from: usize, to: usize },
    /// Nothing else fired.
    NoSignificantChange,
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::FirstScan {
                location_id,
                aircraft,
                vehicles,
            } => write!(
                f,
                "First scan of location {location_id}: baseline established with {aircraft} aircraft and {vehicles} vehicles."
            ),
            Insight::AircraftIncrease(n) => write!(
                f,
                "Aircraft increase (+{n}): possible reinforcements or incoming mission detected."
            ),
            Insight::AircraftDecrease(n) => write!(
                f,
                "Aircraft decrease ({n}): possible deployment or patrol in progress."
            ),
            Insight::VehicleIncrease(n) => write!(
                f,
                "Vehicle increase (+{n}): troop movement or supply loading may be underway."
            ),
            Insight::VehicleDecrease(n) => write!(
                f,
                "Vehicle decrease ({n}): some vehicles may have departed the area."
            ),
            Insight::SignificantIncrease => write!(
                f,
                "Significant activity increase: major operational changes detected."
            ),
            Insight::SignificantDecrease => write!(
                f,
                "Significant activity decrease: possible mission completion or relocation."
            ),
            Insight::Stable => write!(
                f,
                "Stable activity levels: no major changes detected, base status steady."
            ),
            Insight::AircraftRepositioned { from, to } => write!(
                f,
                "Aircraft repositioning detected: position count changed from {from} to {to}."
            ),
            Insight::VehicleRepositioned { from, to } => write!(
                f,
                "Vehicle repositioning detected: position count changed from {from} to {to}."
            ),
            Insight::NoSignificantChange => {
                write!(f, "No significant changes detected since last scan.")
            }
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Insight {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The analysis produced for one scan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ChangeResult {
    /// Deltas against the previous snapshot; `None` on a first scan.
    pub changes: Option<ChangeSet>,
    /// Insights in rule order. Never empty.
    pub insights: Vec<Insight>,
    /// True exactly when no record existed for the location beforehand.
    pub is_first_scan: bool,
    /// Capture time of the scan that was analysed.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
}

impl ChangeResult {
    /// Insights rendered as strings.
    pub fn messages(&self) -> Vec<String> {
        self.insights.iter().map(ToString::to_string).collect()
    }
}

/// Everything returned from processing one detection payload.
///
/// Serializes flat: `{ changes, insights, is_first_scan, timestamp,
/// current_record, location_id }`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProcessOutcome {
    /// The analysis of this scan.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub result: ChangeResult,
    /// The record now stored for the location.
    pub current_record: LocationRecord,
    /// The location the scan was filed under.
    pub location_id: String,
}
