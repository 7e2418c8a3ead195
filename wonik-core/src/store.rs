//! SQLite medication store.
//!
//! One row per recorded medication:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS medications (
//!     id         INTEGER PRIMARY KEY AUTOINCREMENT,
//!     name       TEXT NOT NULL,
//!     dosage     TEXT NOT NULL DEFAULT '',
//!     time       TEXT NOT NULL DEFAULT '',
//!     notes      TEXT NOT NULL DEFAULT '',
//!     created_at TEXT NOT NULL,
//!     ai_info    TEXT
//! );
//! ```
//!
//! Attached advice is stored as JSON so new record kinds need no migration.
//! The store assumes a single writer.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use tracing::{debug, info};

use crate::config::PersistenceConfig;
use crate::error::{Result, WonikError};
use crate::types::{AttachedInfo, MedicationEntity, MedicationId, MedicationPatch, NewMedication};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS medications (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    dosage     TEXT NOT NULL DEFAULT '',
    time       TEXT NOT NULL DEFAULT '',
    notes      TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    ai_info    TEXT
);";

const SELECT_COLUMNS: &str = "SELECT id, name, dosage, time, notes, created_at, ai_info FROM medications";

/// Handle to an open SQLite database of medications.
///
/// ```no_run
/// # use wonik_core::store::MedicationStore;
/// # use wonik_core::config::PersistenceConfig;
/// # use wonik_core::types::NewMedication;
/// let mut store = MedicationStore::open("wonik_health.db", &PersistenceConfig::default())?;
/// let id = store.add(&NewMedication::named("타이레놀"))?;
/// assert!(store.get(id)?.is_some());
/// # Ok::<(), wonik_core::error::WonikError>(())
/// ```
pub struct MedicationStore {
    conn: Connection,
    db_path: PathBuf,
}

impl std::fmt::Debug for MedicationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedicationStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl MedicationStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WonikError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        info!(path = %db_path.display(), wal = config.wal_mode, "Medication store opened");
        Ok(Self { conn, db_path })
    }

    /// Open an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`WonikError::Database`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// Path of the database file (or `:memory:`).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------

    /// Insert a medication and return its new id.
    ///
    /// # Errors
    ///
    /// Returns [`WonikError::Database`] on SQLite failures.
    pub fn add(&mut self, medication: &NewMedication) -> Result<MedicationId> {
        // Fixed-width timestamps keep text ordering chronological.
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        self.conn.execute(
            "INSERT INTO medications (name, dosage, time, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                medication.name,
                medication.dosage,
                medication.time,
                medication.notes,
                now
            ],
        )?;
        let id = MedicationId(self.conn.last_insert_rowid());
        info!(%id, name = %medication.name, "Medication added");
        Ok(id)
    }

    /// All medications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`WonikError::Database`] or [`WonikError::Serialization`].
    pub fn all(&self) -> Result<Vec<MedicationEntity>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"))?;
        let rows = stmt.query_map([], read_row)?;

        let mut medications = Vec::new();
        for row in rows {
            medications.push(row?.into_entity()?);
        }
        debug!(count = medications.len(), "Loaded medications");
        Ok(medications)
    }

    /// One medication by id.
    ///
    /// # Errors
    ///
    /// Returns [`WonikError::Database`] or [`WonikError::Serialization`].
    pub fn get(&self, id: MedicationId) -> Result<Option<MedicationEntity>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
        let row = stmt.query_row(params![id.0], read_row).optional()?;
        row.map(RawRow::into_entity).transpose()
    }

    /// Apply `patch` and return the updated medication. An empty patch
    /// only reads the row back.
    ///
    /// # Errors
    ///
    /// Returns [`WonikError::NotFound`] if no row has `id`, or
    /// [`WonikError::Database`] / [`WonikError::Serialization`].
    pub fn update(&mut self, id: MedicationId, patch: &MedicationPatch) -> Result<MedicationEntity> {
        if patch.is_empty() {
            return self.get(id)?.ok_or(WonikError::NotFound(id));
        }

        let ai_info = patch
            .ai_info
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| WonikError::Serialization(e.to_string()))?;

        let changed = self.conn.execute(
            "UPDATE medications SET
                name    = COALESCE(?2, name),
                dosage  = COALESCE(?3, dosage),
                time    = COALESCE(?4, time),
                notes   = COALESCE(?5, notes),
                ai_info = COALESCE(?6, ai_info)
             WHERE id = ?1",
            params![id.0, patch.name, patch.dosage, patch.time, patch.notes, ai_info],
        )?;
        if changed == 0 {
            return Err(WonikError::NotFound(id));
        }

        info!(%id, attached = patch.ai_info.is_some(), "Medication updated");
        self.get(id)?.ok_or(WonikError::NotFound(id))
    }

    /// Delete a medication; returns the number of rows removed (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`WonikError::Database`] on SQLite failures.
    pub fn delete(&mut self, id: MedicationId) -> Result<usize> {
        let changes = self
            .conn
            .execute("DELETE FROM medications WHERE id = ?1", params![id.0])?;
        info!(%id, changes, "Medication deleted");
        Ok(changes)
    }

    /// Number of stored medications.
    ///
    /// # Errors
    ///
    /// Returns [`WonikError::Database`] on SQLite failures.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM medications", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

/// Columns as read, before JSON and timestamp decoding.
struct RawRow {
    id: i64,
    name: String,
    dosage: String,
    time: String,
    notes: String,
    created_at: String,
    ai_info: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        name: row.get(1)?,
        dosage: row.get(2)?,
        time: row.get(3)?,
        notes: row.get(4)?,
        created_at: row.get(5)?,
        ai_info: row.get(6)?,
    })
}

impl RawRow {
    fn into_entity(self) -> Result<MedicationEntity> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| WonikError::Serialization(format!("created_at {:?}: {e}", self.created_at)))?
            .with_timezone(&Utc);
        let ai_info = self
            .ai_info
            .as_deref()
            .map(serde_json::from_str::<AttachedInfo>)
            .transpose()
            .map_err(|e| WonikError::Serialization(e.to_string()))?;

        Ok(MedicationEntity {
            id: MedicationId(self.id),
            name: self.name,
            dosage: self.dosage,
            time: self.time,
            notes: self.notes,
            created_at,
            ai_info,
        })
    }
}
