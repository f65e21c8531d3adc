use crate::{DaybookError, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// An open connection to the embedded store, with the schema in place.
///
/// `Storage` owns the one connection for the whole process: construct it at
/// application start and hand it to [`Daybook`](super::daybook::Daybook).
/// Bootstrap is idempotent, so `create` and `open` are safe on both fresh
/// and existing files.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the store file at `path` and ensures both tables exist.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path).map_err(DaybookError::StoreUnavailable)?;
        Self::bootstrap(conn)
    }

    /// Opens an existing store file, ensuring the schema is present and
    /// migrated. Same semantics as [`Storage::create`]; both names exist so
    /// call sites can say what they mean.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::create(path)
    }

    /// Opens an in-memory store, mainly for tests and scratch sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DaybookError::StoreUnavailable)?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        // Cascading deletes from notes to events rely on this pragma.
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(DaybookError::StoreUnavailable)?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(DaybookError::StoreUnavailable)?;
        conn.execute_batch(include_str!("schema.sql"))
            .map_err(DaybookError::StoreUnavailable)?;

        // Migrate: add the `type` discriminator column to databases created
        // before the second schema revision.
        let column_exists: bool = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('notes') WHERE name='type'",
                [],
                |row| row.get::<_, i64>(0).map(|count| count > 0),
            )
            .map_err(DaybookError::StoreUnavailable)?;

        if !column_exists {
            info!("migrating notes table: adding type column");
            conn.execute(
                "ALTER TABLE notes ADD COLUMN type TEXT NOT NULL DEFAULT 'note'",
                [],
            )
            .map_err(DaybookError::StoreUnavailable)?;
        }

        debug!("store bootstrapped");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_create_storage() {
        let temp = NamedTempFile::new().unwrap();
        let storage = Storage::create(temp.path()).unwrap();

        // Verify tables exist
        let tables: Vec<String> = storage
            .connection()
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert!(tables.contains(&"notes".to_string()));
        assert!(tables.contains(&"events".to_string()));
    }

    #[test]
    fn test_bootstrap_is_idempotent() {
        let temp = NamedTempFile::new().unwrap();

        {
            let storage = Storage::create(temp.path()).unwrap();
            storage
                .connection()
                .execute(
                    "INSERT INTO notes (name, content, time_created, time_updated)
                     VALUES ('keep', '[]', '2025-01-01T00:00:00+00:00', '2025-01-01T00:00:00+00:00')",
                    [],
                )
                .unwrap();
        }

        // Opening again must not error and must not touch existing rows.
        let storage = Storage::open(temp.path()).unwrap();
        let count: i64 = storage
            .connection()
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let storage = Storage::open_in_memory().unwrap();
        let enabled: i64 = storage
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_migration_adds_type_column() {
        let temp = NamedTempFile::new().unwrap();

        // Create database with the first-revision schema (no `type` column).
        {
            let conn = Connection::open(temp.path()).unwrap();
            conn.execute(
                "CREATE TABLE notes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    content TEXT NOT NULL,
                    time_created TEXT NOT NULL,
                    time_updated TEXT
                )",
                [],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO notes (name, content, time_created, time_updated)
                 VALUES ('old', '[]', '2024-06-01T00:00:00+00:00', '2024-06-01T00:00:00+00:00')",
                [],
            )
            .unwrap();
        }

        // Open storage (should trigger migration)
        let storage = Storage::open(temp.path()).unwrap();

        let kind: String = storage
            .connection()
            .query_row("SELECT type FROM notes WHERE name = 'old'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(kind, "note", "migrated rows should take the default kind");
    }
}
