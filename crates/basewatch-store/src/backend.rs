//! Storage backends.
//!
//! A [`StorageBackend`] moves the whole location map to and from durable
//! storage in one piece. [`LocationStore`](crate::LocationStore) calls
//! `load` once at startup and `save` after every mutation.
//!
//! Two backends ship with the crate:
//!
//! - [`JsonFileBackend`]: a single pretty-printed JSON document
//! - [`SqliteBackend`](crate::SqliteBackend): one row per location in SQLite
//!
//! # JSON document format
//!
//! ```json
//! {
//!   "version": 1,
//!   "locations": {
//!     "base_40.710_-74.010": { "location_id": "base_40.710_-74.010", ... }
//!   }
//! }
//! ```
//!
//! Files without a `version` field are read as the legacy layout, where the
//! top-level keys are the location ids themselves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use basewatch_types::LocationRecord;

use crate::error::{Error, Result};

/// All stored records keyed by location id.
pub type LocationMap = BTreeMap<String, LocationRecord>;

/// Current JSON document format version.
pub const FORMAT_VERSION: u64 = 1;

/// Durable storage for the full location map.
pub trait StorageBackend: Send {
    /// Read the full map.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<LocationMap>>;

    /// Replace the stored map with `locations`.
    ///
    /// Must not return until the data is durable.
    fn save(&self, locations: &LocationMap) -> Result<()>;

    /// Short human-readable description used in log messages.
    fn describe(&self) -> String;
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u64,
    locations: &'a LocationMap,
}

#[derive(Deserialize)]
struct Document {
    locations: LocationMap,
}

/// Stores the location map as one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend for the given file path. The file need not exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file this backend reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<LocationMap>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        parse_document(&content).map(Some)
    }

    fn save(&self, locations: &LocationMap) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(&DocumentRef {
            version: FORMAT_VERSION,
            locations,
        })?;

        // Write beside the target and rename so readers never see half a file
        let temp = self.temp_path();
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;

        debug!(
            "Wrote {} locations to {}",
            locations.len(),
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

/// Parse either the versioned document or the legacy flat map.
fn parse_document(content: &str) -> Result<LocationMap> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    match value.get("version").and_then(serde_json::Value::as_u64) {
        Some(found) if found > FORMAT_VERSION => Err(Error::UnsupportedVersion {
            found,
            supported: FORMAT_VERSION,
        }),
        Some(_) => {
            let document: Document = serde_json::from_value(value)?;
            Ok(document.locations)
        }
        None => Ok(serde_json::from_value(value)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record(id: &str, aircraft: u64) -> LocationRecord {
        LocationRecord {
            location_id: id.to_string(),
            timestamp: datetime!(2024-03-10 08:30:00 UTC),
            aircraft_count: aircraft,
            vehicle_count: 2,
            aircraft_positions: vec![[0.0, 0.0, 10.0, 10.0]; aircraft as usize],
            vehicle_positions: vec![[20.0, 20.0, 25.0, 25.0], [30.0, 30.0, 35.0, 35.0]],
            total_count: aircraft + 2,
            category_breakdown: BTreeMap::new(),
        }
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("records.json"));
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("records.json"));

        let mut map = LocationMap::new();
        map.insert("base_1.000_2.000".to_string(), record("base_1.000_2.000", 3));
        backend.save(&map).unwrap();

        let loaded = backend.load().unwrap().unwrap();
        assert_eq!(loaded, map);
        assert!(!backend.temp_path().exists());
    }

    #[test]
    fn test_saved_document_is_versioned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let backend = JsonFileBackend::new(&path);
        backend.save(&LocationMap::new()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], FORMAT_VERSION);
        assert!(raw["locations"].is_object());
    }

    #[test]
    fn test_load_legacy_flat_document() {
        let legacy = r#"{
            "base_10.000_20.000": {
                "location_id": "base_10.000_20.000",
                "timestamp": "2024-02-01T10:00:00Z",
                "aircraft": 4,
                "vehicles": 1,
                "aircraft_positions": [],
                "vehicle_positions": [],
                "total_vehicles": 5,
                "vehicle_counts": {}
            }
        }"#;

        let map = parse_document(legacy).unwrap();
        let stored = &map["base_10.000_20.000"];
        assert_eq!(stored.aircraft_count, 4);
        assert_eq!(stored.vehicle_count, 1);
        assert_eq!(stored.total_count, 5);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let result = parse_document(r#"{"version": 99, "locations": {}}"#);
        assert!(matches!(
            result,
            Err(Error::UnsupportedVersion {
                found: 99,
                supported: FORMAT_VERSION
            })
        ));
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        assert!(matches!(
            parse_document("{not json"),
            Err(Error::Serialization(_))
        ));
    }
}
