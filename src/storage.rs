//! SQLite storage layer for feedback submissions.
//!
//! Owns the `users` table: schema creation, the versioned upgrade of legacy
//! databases, inserts, and the retention sweep. Timestamps are always taken
//! from the database clock (`datetime('now')`) so inserts and the sweep agree
//! regardless of the application host's clock.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use thiserror::Error;

/// Schema version this binary migrates databases up to.
pub const SCHEMA_VERSION: i64 = 2;

/// Records older than this many days are removed by the retention sweep.
pub const RETENTION_DAYS: u32 = 10;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: i64, supported: i64 },
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A feedback submission as stored in the `users` table.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRow {
    pub name: String,
    pub email: String,
    pub message: String,
    /// `YYYY-MM-DD HH:MM:SS` in UTC, assigned by SQLite at insert time.
    /// `None` only for legacy rows the backfill could not reach.
    pub created_at: Option<String>,
}

/// What [`Storage::ensure_schema`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub from_version: i64,
    pub to_version: i64,
    pub added_created_at: bool,
    pub backfilled_rows: usize,
}

impl SchemaReport {
    pub fn is_noop(&self) -> bool {
        self.from_version == self.to_version && !self.added_created_at && self.backfilled_rows == 0
    }
}

// ---------------------------------------------------------------------------
// Storage handle
// ---------------------------------------------------------------------------

/// Storage handle wrapping a single SQLite connection.
///
/// Handles are cheap to open and are not shared between requests: each
/// submission opens its own and drops it when done.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database file at `path`. Does not touch the schema;
    /// call [`Storage::ensure_schema`] for that.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Read `PRAGMA user_version`.
    pub fn schema_version(&self) -> Result<i64, StorageError> {
        let version = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Whether `table` currently has a column called `column`.
    pub fn has_column(&self, table: &str, column: &str) -> Result<bool, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            params![table, column],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Bring the schema up to [`SCHEMA_VERSION`].
    ///
    /// Every step is idempotent, so calling this on an up-to-date database
    /// changes nothing. Databases created by the legacy setup script sit at
    /// version 0 with a `users` table lacking `created_at`; they pass through
    /// both steps and come out with the column added and backfilled.
    pub fn ensure_schema(&self) -> Result<SchemaReport, StorageError> {
        let from_version = self.schema_version()?;
        if from_version > SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: from_version,
                supported: SCHEMA_VERSION,
            });
        }

        let mut report = SchemaReport {
            from_version,
            to_version: from_version,
            ..SchemaReport::default()
        };

        let tx = self.conn.unchecked_transaction()?;

        // Not gated on the version: the table may have been dropped from a
        // database that already records a newer version.
        tx.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                name        TEXT,
                email       TEXT,
                message     TEXT,
                created_at  TEXT DEFAULT CURRENT_TIMESTAMP
            );",
        )?;

        // Checked on every pass rather than trusting the version number: a
        // legacy table can exist at version 0 with or without the column.
        if !self.has_column("users", "created_at")? {
            // SQLite refuses ADD COLUMN with a non-constant default.
            tx.execute_batch("ALTER TABLE users ADD COLUMN created_at TEXT;")?;
            report.added_created_at = true;
        }

        if from_version < 2 || report.added_created_at {
            match tx.execute(
                "UPDATE users SET created_at = datetime('now') WHERE created_at IS NULL",
                [],
            ) {
                Ok(n) => report.backfilled_rows = n,
                Err(e) => tracing::warn!("created_at backfill skipped: {e}"),
            }
        }

        if from_version < SCHEMA_VERSION {
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            report.to_version = SCHEMA_VERSION;
        }

        tx.commit()?;
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Feedback
    // -----------------------------------------------------------------------

    /// Insert a submission stamped with the database's current time.
    pub fn insert_feedback(&self, name: &str, email: &str, message: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO users (name, email, message, created_at)
             VALUES (?1, ?2, ?3, datetime('now'))",
            params![name, email, message],
        )?;
        Ok(())
    }

    /// Delete every submission older than `days` days by the database clock.
    /// Returns the number of rows removed.
    pub fn purge_older_than(&self, days: u32) -> Result<usize, StorageError> {
        let modifier = format!("-{days} days");
        let removed = self.conn.execute(
            "DELETE FROM users WHERE datetime(created_at) < datetime('now', ?1)",
            params![modifier],
        )?;
        Ok(removed)
    }

    /// Run the standard retention sweep ([`RETENTION_DAYS`]).
    pub fn purge_expired(&self) -> Result<usize, StorageError> {
        self.purge_older_than(RETENTION_DAYS)
    }

    /// All stored submissions, oldest first.
    #[cfg(test)]
    pub fn list_feedback(&self) -> Result<Vec<FeedbackRow>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, email, message, created_at
             FROM users ORDER BY datetime(created_at), rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(FeedbackRow {
                name: row.get(0)?,
                email: row.get(1)?,
                message: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Current time according to the database, in the `created_at` format.
    #[cfg(test)]
    pub fn db_now(&self) -> Result<String, StorageError> {
        let now = self
            .conn
            .query_row("SELECT datetime('now')", [], |row| row.get(0))?;
        Ok(now)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the database path, falling back to `database.db` in the working
/// directory.
pub fn db_path(configured: Option<&Path>) -> PathBuf {
    configured
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("database.db"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
