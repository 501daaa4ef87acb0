//! SQLite storage backend.

use std::path::Path;

use rusqlite::Connection;
use time::OffsetDateTime;
use tracing::{debug, info};

use basewatch_types::LocationRecord;

use crate::backend::{LocationMap, StorageBackend};
use crate::error::{Error, Result};
use crate::schema;

/// Stores one row per location in a SQLite database.
///
/// Each row holds the record as JSON, so the on-disk shape of a record is
/// the same as in [`JsonFileBackend`](crate::JsonFileBackend).
pub struct SqliteBackend {
    conn: Connection,
    label: String,
}

impl SqliteBackend {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self {
            conn,
            label: format!("sqlite:{}", path.display()),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn,
            label: "sqlite::memory:".to_string(),
        })
    }

    /// Number of location rows currently in the database.
    #[cfg(test)]
    pub(crate) fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl StorageBackend for SqliteBackend {
    fn load(&self) -> Result<Option<LocationMap>> {
        let mut stmt = self.conn.prepare("SELECT id, record FROM locations")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut locations = LocationMap::new();
        for (id, json) in rows {
            let record: LocationRecord = serde_json::from_str(&json)?;
            locations.insert(id, record);
        }

        Ok(Some(locations))
    }

    fn save(&self, locations: &LocationMap) -> Result<()> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("DELETE FROM locations", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO locations (id, record, updated_at) VALUES (?1, ?2, ?3)",
            )?;
            for (id, record) in locations {
                let json = serde_json::to_string(record)?;
                insert.execute(rusqlite::params![id, json, now])?;
            }
        }
        tx.commit()?;

        debug!("Wrote {} locations to {}", locations.len(), self.label);
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
