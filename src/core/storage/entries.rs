//! SQLite-backed entry store.
//!
//! One table, `phonebook_entry`, keyed by an AUTOINCREMENT id so deleted
//! ids are never handed out again.

use crate::core::error::{PhonebookError, Result};
use crate::core::storage::EntryStore;
use crate::core::types::{NewEntry, PageRequest, PhonebookEntry};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS phonebook_entry (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    phone TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);";

const ENTRY_SELECT_SQL: &str = "SELECT id, phone, name FROM phonebook_entry";

/// Entry store over a single SQLite connection
pub struct SqliteEntryStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteEntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteEntryStore")
            .field("conn", &"<connection>")
            .finish()
    }
}

impl SqliteEntryStore {
    /// Open (or create) the database file and ensure the table exists
    pub fn open(path: &Path) -> Result<Self> {
        let started_at = Instant::now();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self::bootstrap(conn)?;

        tracing::info!(
            path = %path.display(),
            duration_ms = %started_at.elapsed().as_millis(),
            "Entry store opened"
        );

        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PhonebookError::StorageError("Connection lock poisoned".to_string()))
    }
}

impl EntryStore for SqliteEntryStore {
    fn insert(&self, entry: &NewEntry) -> Result<PhonebookEntry> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO phonebook_entry (phone, name) VALUES (?1, ?2);",
            params![entry.phone.as_str(), entry.name.as_str()],
        )?;

        Ok(PhonebookEntry {
            id: conn.last_insert_rowid(),
            phone: entry.phone.clone(),
            name: entry.name.clone(),
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<PhonebookEntry>> {
        let conn = self.lock()?;
        let entry = conn
            .query_row(
                &format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_entry_row,
            )
            .optional()?;

        Ok(entry)
    }

    fn find_all(&self, page: PageRequest) -> Result<(Vec<PhonebookEntry>, usize)> {
        let conn = self.lock()?;

        let total: i64 =
            conn.query_row("SELECT COUNT(*) FROM phonebook_entry;", [], |row| row.get(0))?;

        let limit = i64::try_from(page.size).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let mut stmt =
            conn.prepare(&format!("{ENTRY_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"))?;
        let entries = stmt
            .query_map(params![limit, offset], parse_entry_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok((entries, total as usize))
    }

    fn save(&self, entry: &PhonebookEntry) -> Result<PhonebookEntry> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO phonebook_entry (id, phone, name) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET phone = excluded.phone, name = excluded.name;",
            params![entry.id, entry.phone.as_str(), entry.name.as_str()],
        )?;

        Ok(entry.clone())
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM phonebook_entry WHERE id = ?1;", params![id])?;
        Ok(())
    }

    fn exists(&self, id: i64) -> Result<bool> {
        let conn = self.lock()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM phonebook_entry WHERE id = ?1;",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(found.is_some())
    }

    fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let total: i64 =
            conn.query_row("SELECT COUNT(*) FROM phonebook_entry;", [], |row| row.get(0))?;
        Ok(total as usize)
    }
}

fn parse_entry_row(row: &Row<'_>) -> rusqlite::Result<PhonebookEntry> {
    Ok(PhonebookEntry {
        id: row.get(0)?,
        phone: row.get(1)?,
        name: row.get(2)?,
    })
}
