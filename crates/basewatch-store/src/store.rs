//! Main store implementation.

use std::path::Path;

use tracing::{debug, info, warn};

use basewatch_types::LocationRecord;

use crate::backend::{JsonFileBackend, LocationMap, StorageBackend};
use crate::error::{Error, Result};
use crate::sqlite::SqliteBackend;

/// Last-write-wins map from location id to its latest [`LocationRecord`].
///
/// The whole map lives in memory and is written through to the backend on
/// every [`put`](Self::put).
pub struct LocationStore {
    backend: Box<dyn StorageBackend>,
    locations: LocationMap,
    /// Set when the stored data uses a newer format; writes are refused.
    newer_format: Option<u64>,
}

impl LocationStore {
    /// Load the store from a backend.
    ///
    /// Missing, unreadable or corrupt storage is logged and treated as an
    /// empty store; this never fails.
    ///
    /// Storage written by a newer format version is left untouched: the
    /// store starts empty and every [`put`](Self::put) fails with
    /// [`Error::UnsupportedVersion`].
    pub fn load<B: StorageBackend + 'static>(backend: B) -> Self {
        let description = backend.describe();
        let mut newer_format = None;

        let locations = match backend.load() {
            Ok(Some(locations)) => {
                info!("Loaded {} locations from {}", locations.len(), description);
                locations
            }
            Ok(None) => {
                info!("No existing records at {}, starting empty", description);
                LocationMap::new()
            }
            Err(Error::UnsupportedVersion { found, supported }) => {
                warn!(
                    "Records at {} use format version {} (supported: {}); store is read-only",
                    description, found, supported
                );
                newer_format = Some(found);
                LocationMap::new()
            }
            Err(e) => {
                warn!(
                    "Failed to load records from {}: {}; starting empty",
                    description, e
                );
                LocationMap::new()
            }
        };

        Self {
            backend: Box::new(backend),
            locations,
            newer_format,
        }
    }

    /// Open a JSON file store at the given path.
    pub fn open_json<P: AsRef<Path>>(path: P) -> Self {
        Self::load(JsonFileBackend::new(path))
    }

    /// Open a JSON file store at the default location.
    pub fn open_default() -> Self {
        Self::open_json(crate::default_store_path())
    }

    /// Open a SQLite store at the given path.
    pub fn open_sqlite<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::load(SqliteBackend::open(path)?))
    }

    /// Open an empty store backed by an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::load(SqliteBackend::open_in_memory()?))
    }

    /// Get the record for a location, if one exists.
    pub fn get(&self, location_id: &str) -> Option<&LocationRecord> {
        self.locations.get(location_id)
    }

    /// Insert or overwrite the record for `record.location_id`, then persist
    /// the full map before returning.
    ///
    /// If persisting fails the in-memory map is restored to what it held
    /// before the call and the error is returned, so memory never runs ahead
    /// of durable storage.
    pub fn put(&mut self, record: LocationRecord) -> Result<()> {
        if let Some(found) = self.newer_format {
            return Err(Error::UnsupportedVersion {
                found,
                supported: crate::backend::FORMAT_VERSION,
            });
        }

        let location_id = record.location_id.clone();
        let previous = self.locations.insert(location_id.clone(), record);

        if let Err(e) = self.backend.save(&self.locations) {
            match previous {
                Some(previous) => {
                    self.locations.insert(location_id.clone(), previous);
                }
                None => {
                    self.locations.remove(&location_id);
                }
            }
            warn!("Failed to persist record for {}: {}", location_id, e);
            return Err(e);
        }

        debug!("Stored record for {}", location_id);
        Ok(())
    }

    /// All known location ids, in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    /// All stored records, ordered by location id.
    pub fn records(&self) -> impl Iterator<Item = &LocationRecord> {
        self.locations.values()
    }

    /// Whether a record exists for the location.
    pub fn contains(&self, location_id: &str) -> bool {
        self.locations.contains_key(location_id)
    }

    /// Whether writes are refused because storage holds a newer format.
    pub fn is_read_only(&self) -> bool {
        self.newer_format.is_some()
    }

    /// Number of stored locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the store holds no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Description of the backend, for logs and health output.
    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }
}
