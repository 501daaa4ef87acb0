//! Write-through persistence of per-location detection snapshots.
//!
//! This crate keeps the latest [`LocationRecord`](basewatch_types::LocationRecord)
//! for every location in memory and writes the full map to durable storage
//! after each change.
//!
//! # Features
//!
//! - Last-write-wins map, one record per location id
//! - Pluggable [`StorageBackend`]: versioned JSON file or SQLite
//! - Reads legacy unversioned JSON files
//! - Startup never fails on missing or corrupt storage
//! - Write failures are returned to the caller and rolled back in memory
//!
//! # Example
//!
//! ```no_run
//! use basewatch_store::LocationStore;
//!
//! let store = LocationStore::open_default();
//! for id in store.keys() {
//!     println!("{id}");
//! }
//! ```

mod backend;
mod error;
mod schema;
mod sqlite;
mod store;

pub use backend::{FORMAT_VERSION, JsonFileBackend, LocationMap, StorageBackend};
pub use error::{Error, Result};
pub use sqlite::SqliteBackend;
pub use store::LocationStore;

/// Default store path following platform conventions.
///
/// - Linux: `~/.local/share/basewatch/base_records.json`
/// - macOS: `~/Library/Application Support/basewatch/base_records.json`
/// - Windows: `C:\Users\<user>\AppData\Local\basewatch\base_records.json`
pub fn default_store_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("basewatch")
        .join("base_records.json")
}
