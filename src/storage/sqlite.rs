//! SQLite storage backend

use super::traits::{FlatRow, LineageStore, OpenStore, RowKind, StorageError, StorageResult};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed row store
///
/// One `rows` table holds the flattened edge list; `save_rows` replaces the
/// whole set in a single transaction. Thread-safe via an internal mutex on
/// the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS rows (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                name TEXT NOT NULL,
                related_to TEXT,
                label TEXT
            );

            -- WAL allows concurrent reads while a save is in flight
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl LineageStore for SqliteStore {
    fn load_rows(&self) -> StorageResult<Vec<FlatRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT kind, name, related_to, label FROM rows ORDER BY seq")?;
        let mapped = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut rows = Vec::new();
        for record in mapped {
            let (kind, name, related_to, label) = record?;
            let kind = RowKind::parse(&kind)
                .ok_or_else(|| StorageError::Corrupt(format!("unknown row kind '{}'", kind)))?;
            rows.push(FlatRow {
                kind,
                name,
                related_to,
                label,
            });
        }
        Ok(rows)
    }

    fn save_rows(&self, rows: &[FlatRow]) -> StorageResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM rows", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO rows (kind, name, related_to, label) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.kind.as_str(),
                    row.name,
                    row.related_to,
                    row.label
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}
