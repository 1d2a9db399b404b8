//! SQLite-backed observation store.
//!
//! Schema:
//! - travel_times: one row per directional sample, append-only
//! - idx_travel_times_lookup: (destination, observed_at)
//! - idx_travel_times_origin_dest_time: (origin, destination, observed_at)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OpenFlags};

use crate::store::observation::{
    format_observed_at, parse_observed_at, Observation, StoreError, StoreResult,
};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS travel_times (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        origin TEXT NOT NULL,
        destination TEXT NOT NULL,
        duration_seconds INTEGER NOT NULL,
        distance_meters INTEGER,
        observed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_travel_times_lookup
        ON travel_times (destination, observed_at);

    CREATE INDEX IF NOT EXISTS idx_travel_times_origin_dest_time
        ON travel_times (origin, destination, observed_at);
"#;

const INSERT: &str = "INSERT INTO travel_times
    (origin, destination, duration_seconds, distance_meters, observed_at)
    VALUES (?1, ?2, ?3, ?4, ?5)";

/// Lets a reader and the sampler share the file without spurious SQLITE_BUSY.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the travel-time database.
pub struct ObservationStore {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl ObservationStore {
    /// Open (creating if needed) the database at `path`.
    ///
    /// Parent directories are created as needed. The schema is not touched;
    /// call [`ensure_schema`](Self::ensure_schema) afterwards.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open an existing database for reading only.
    ///
    /// Never creates the file, its directories, or the schema.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::Missing(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open and ensure the schema in one step.
    pub fn open_ready<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let store = Self::open(path)?;
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the table and its indexes if they do not exist yet.
    pub fn ensure_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Path this store was opened at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert `observations` in a single transaction.
    ///
    /// Either every row is written or none is.
    pub fn append(&mut self, observations: &[Observation]) -> StoreResult<usize> {
        self.append_batches(&[observations])
    }

    /// Insert several batches in one transaction, one insert pass per
    /// non-empty batch.
    pub fn append_batches(&mut self, batches: &[&[Observation]]) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(INSERT)?;
            for batch in batches.iter().filter(|b| !b.is_empty()) {
                for obs in batch.iter() {
                    stmt.execute(params![
                        obs.origin,
                        obs.destination,
                        obs.duration_seconds,
                        obs.distance_meters,
                        format_observed_at(&obs.observed_at),
                    ])?;
                    inserted += 1;
                }
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Total number of stored rows.
    pub fn count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM travel_times", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Every stored row in insertion order.
    pub fn observations(&self) -> StoreResult<Vec<Observation>> {
        let mut stmt = self.conn.prepare(
            "SELECT origin, destination, duration_seconds, distance_meters, observed_at
             FROM travel_times ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, Option<u32>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut observations = Vec::new();
        for row in rows {
            let (origin, destination, duration_seconds, distance_meters, observed_at) = row?;
            let observed_at =
                parse_observed_at(&observed_at).ok_or(StoreError::InvalidTimestamp(observed_at))?;
            observations.push(Observation {
                origin,
                destination,
                duration_seconds,
                distance_meters,
                observed_at,
            });
        }
        Ok(observations)
    }

    /// Delete every row observed (UTC) during `year`. Maintenance only.
    pub fn delete_year(&mut self, year: i32) -> StoreResult<usize> {
        let Some(next) = year.checked_add(1) else {
            return Ok(0);
        };
        let deleted = self.conn.execute(
            "DELETE FROM travel_times WHERE observed_at >= ?1 AND observed_at < ?2",
            params![format!("{:04}-", year), format!("{:04}-", next)],
        )?;
        Ok(deleted)
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }
}

impl std::fmt::Debug for ObservationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservationStore")
            .field("path", &self.path)
            .finish()
    }
}

/// Run `f` against a freshly opened store on the blocking pool.
///
/// The connection is opened, schema-ensured and closed around `f`; nothing is
/// shared between calls.
pub async fn with_store<T, F>(path: PathBuf, f: F) -> StoreResult<T>
where
    F: FnOnce(&mut ObservationStore) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut store = ObservationStore::open_ready(&path)?;
        let result = f(&mut store)?;
        store.close()?;
        Ok(result)
    })
    .await?
}

/// Run `f` against an existing store, read-only, on the blocking pool.
pub async fn with_read_store<T, F>(path: PathBuf, f: F) -> StoreResult<T>
where
    F: FnOnce(&ObservationStore) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let store = ObservationStore::open_read_only(&path)?;
        let result = f(&store)?;
        store.close()?;
        Ok(result)
    })
    .await?
}
