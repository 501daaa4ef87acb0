//! Read-only views over a [`LocationStore`].

use basewatch_store::LocationStore;
use basewatch_types::{LocationRecord, LocationStats};

/// The latest snapshot for a location, or `None` if it was never scanned.
pub fn get_location_history<'a>(
    store: &'a LocationStore,
    location_id: &str,
) -> Option<&'a LocationRecord> {
    store.get(location_id)
}

/// Every known location id, in ascending order.
pub fn get_all_locations(store: &LocationStore) -> Vec<String> {
    store.keys().map(str::to_string).collect()
}

/// Aggregate figures over the store.
///
/// Only the latest snapshot per location is kept, so `total_scans` equals
/// `total_locations`.
pub fn get_location_stats(store: &LocationStore) -> LocationStats {
    LocationStats {
        total_locations: store.len(),
        total_scans: store.len(),
        latest_scan: store.records().map(|r| r.timestamp).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record(id: &str, timestamp: time::OffsetDateTime) -> LocationRecord {
        LocationRecord {
            location_id: id.to_string(),
            timestamp,
            aircraft_count: 0,
            vehicle_count: 0,
            aircraft_positions: vec![],
            vehicle_positions: vec![],
            total_count: 0,
            category_breakdown: Default::default(),
        }
    }

    #[test]
    fn test_empty_store() {
        let store = LocationStore::open_in_memory().unwrap();

        assert!(get_location_history(&store, "base_1.000_1.000").is_none());
        assert!(get_all_locations(&store).is_empty());

        let stats = get_location_stats(&store);
        assert_eq!(stats.total_locations, 0);
        assert_eq!(stats.total_scans, 0);
        assert!(stats.latest_scan.is_none());
    }

    #[test]
    fn test_populated_store() {
        let mut store = LocationStore::open_in_memory().unwrap();
        store
            .put(record("base_2.000_2.000", datetime!(2024-01-02 00:00:00 UTC)))
            .unwrap();
        store
            .put(record("base_1.000_1.000", datetime!(2024-03-01 12:00:00 UTC)))
            .unwrap();
        store
            .put(record("base_3.000_3.000", datetime!(2023-12-31 23:59:59 UTC)))
            .unwrap();

        assert_eq!(
            get_all_locations(&store),
            vec!["base_1.000_1.000", "base_2.000_2.000", "base_3.000_3.000"]
        );
        assert_eq!(
            get_location_history(&store, "base_2.000_2.000").map(|r| r.timestamp),
            Some(datetime!(2024-01-02 00:00:00 UTC))
        );

        let stats = get_location_stats(&store);
        assert_eq!(stats.total_locations, 3);
        assert_eq!(stats.total_scans, 3);
        assert_eq!(stats.latest_scan, Some(datetime!(2024-03-01 12:00:00 UTC)));
    }

    #[test]
    fn test_latest_scan_compares_instants() {
        let mut store = LocationStore::open_in_memory().unwrap();
        store
            .put(record("a", datetime!(2024-01-01 10:00:00 +05:00)))
            .unwrap();
        store
            .put(record("b", datetime!(2024-01-01 06:00:00 UTC)))
            .unwrap();

        // 10:00+05:00 is 05:00 UTC
        assert_eq!(
            get_location_stats(&store).latest_scan,
            Some(datetime!(2024-01-01 06:00:00 UTC))
        );
    }
}
