//! Insight rules applied to consecutive snapshots.
//!
//! Rules are independent: each one is checked on every follow-up scan and
//! any number may fire together. They are evaluated in this fixed order,
//! which is also the order of the returned list:
//!
//! 1. aircraft increase / decrease
//! 2. vehicle increase / decrease
//! 3. significant total increase / decrease
//! 4. stable activity
//! 5. aircraft repositioning
//! 6. vehicle repositioning
//!
//! If nothing fires the result is a single
//! [`Insight::NoSignificantChange`], so the list is never empty.
//!
//! # Example
//!
//! ```
//! use basewatch_core::InsightThresholds;
//! use basewatch_types::{ChangeSet, Insight};
//!
//! let thresholds = InsightThresholds::default();
//! let changes = ChangeSet { aircraft_diff: 1, vehicle_diff: 1, total_diff: 0 };
//! let insights = thresholds.evaluate_counts(&changes);
//!
//! assert_eq!(
//!     insights,
//!     vec![
//!         Insight::AircraftIncrease(1),
//!         Insight::VehicleIncrease(1),
//!         Insight::Stable,
//!     ]
//! );
//! ```

use serde::{Deserialize, Serialize};

use basewatch_types::{ChangeSet, Insight, LocationRecord};

/// Limits used by the insight rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    /// A total change strictly larger than this (either way) is significant.
    pub significant_total: i64,
    /// Largest aircraft change, either way, still considered stable.
    pub stable_aircraft: i64,
    /// Largest vehicle change, either way, still considered stable.
    pub stable_vehicle: i64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            significant_total: 5,
            stable_aircraft: 1,
            stable_vehicle: 2,
        }
    }
}

impl InsightThresholds {
    /// Run every rule against a pair of snapshots.
    #[must_use]
    pub fn evaluate(
        &self,
        previous: &LocationRecord,
        current: &LocationRecord,
        changes: &ChangeSet,
    ) -> Vec<Insight> {
        let mut insights = self.count_rules(changes);

        if let Some(insight) = repositioning(
            &previous.aircraft_positions,
            &current.aircraft_positions,
            |from, to| Insight::AircraftRepositioned { from, to },
        ) {
            insights.push(insight);
        }
        if let Some(insight) = repositioning(
            &previous.vehicle_positions,
            &current.vehicle_positions,
            |from, to| Insight::VehicleRepositioned { from, to },
        ) {
            insights.push(insight);
        }

        finish(insights)
    }

    /// Run only the count-based rules (1 to 4), for callers without
    /// position data.
    #[must_use]
    pub fn evaluate_counts(&self, changes: &ChangeSet) -> Vec<Insight> {
        finish(self.count_rules(changes))
    }

    fn count_rules(&self, changes: &ChangeSet) -> Vec<Insight> {
        let mut insights = Vec::new();

        match changes.aircraft_diff {
            d if d > 0 => insights.push(Insight::AircraftIncrease(d)),
            d if d < 0 => insights.push(Insight::AircraftDecrease(d)),
            _ => {}
        }

        match changes.vehicle_diff {
            d if d > 0 => insights.push(Insight::VehicleIncrease(d)),
            d if d < 0 => insights.push(Insight::VehicleDecrease(d)),
            _ => {}
        }

        if changes.total_diff > self.significant_total {
            insights.push(Insight::SignificantIncrease);
        } else if changes.total_diff < -self.significant_total {
            insights.push(Insight::SignificantDecrease);
        }

        // An unchanged pair is reported by the sentinel alone
        let moved = changes.aircraft_diff != 0 || changes.vehicle_diff != 0;
        if moved
            && changes.aircraft_diff.abs() <= self.stable_aircraft
            && changes.vehicle_diff.abs() <= self.stable_vehicle
        {
            insights.push(Insight::Stable);
        }

        insights
    }
}

fn repositioning<T>(
    previous: &[T],
    current: &[T],
    insight: impl FnOnce(usize, usize) -> Insight,
) -> Option<Insight> {
    if previous.is_empty() || current.is_empty() || previous.len() == current.len() {
        return None;
    }
    Some(insight(previous.len(), current.len()))
}

fn finish(mut insights: Vec<Insight>) -> Vec<Insight> {
    if insights.is_empty() {
        insights.push(Insight::NoSignificantChange);
    }
    insights
}
