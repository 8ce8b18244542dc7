//! SQLite-backed video store.

use super::{StoreStats, VideoRecord};
use crate::error::{Result, VitenError};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS videos (
        id TEXT PRIMARY KEY,
        run_date TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        creator TEXT NOT NULL,
        source TEXT NOT NULL,
        upload_date TEXT NOT NULL
    );
"#;

/// SQLite-backed store for [`VideoRecord`]s.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at the given path.
    ///
    /// Bootstrap is idempotent: the table is created if absent.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened video store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Check whether a record with the given id exists.
    ///
    /// The idempotency gate: checked before any download or transcription.
    pub fn contains(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let found: Option<String> = conn
            .query_row("SELECT id FROM videos WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert a new record.
    ///
    /// `run_date` is stamped here, at insertion time, not by the caller.
    pub fn insert(&self, record: &VideoRecord) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO videos (id, run_date, title, content, creator, source, upload_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.id,
                Utc::now().to_rfc3339(),
                record.title,
                record.content,
                record.creator,
                record.source,
                record.upload_date,
            ],
        )?;

        debug!("Inserted video {}", record.id);
        Ok(())
    }

    /// Read-only statistics: record count and latest title.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.lock()?;

        let video_count: usize =
            conn.query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))?;

        let latest_title: Option<String> = conn
            .query_row(
                "SELECT title FROM videos ORDER BY run_date DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        Ok(StoreStats {
            video_count,
            latest_title,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| VitenError::Config(format!("Failed to acquire store lock: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(id: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: "Sample".to_string(),
            content: "transcript text".to_string(),
            creator: "Unknown".to_string(),
            source: "Local".to_string(),
            upload_date: String::new(),
        }
    }

    #[test]
    fn test_insert_and_contains() {
        let store = SqliteStore::in_memory().unwrap();

        assert!(!store.contains("abc123def45").unwrap());
        store.insert(&sample_record("abc123def45")).unwrap();
        assert!(store.contains("abc123def45").unwrap());
    }

    #[test]
    fn test_duplicate_insert_is_rejected_by_primary_key() {
        let store = SqliteStore::in_memory().unwrap();
        store.insert(&sample_record("abc123def45")).unwrap();

        // The orchestrator gates on contains() first; the primary key is the
        // store's own backstop.
        assert!(store.insert(&sample_record("abc123def45")).is_err());
    }

    #[test]
    fn test_stats() {
        let store = SqliteStore::in_memory().unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.video_count, 0);
        assert!(stats.latest_title.is_none());

        store.insert(&sample_record("id-one-00001")).unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.video_count, 1);
        assert_eq!(stats.latest_title.as_deref(), Some("Sample"));
    }

    #[test]
    fn test_run_date_is_set_by_store() {
        let store = SqliteStore::in_memory().unwrap();
        store.insert(&sample_record("abc123def45")).unwrap();

        let conn = store.conn.lock().unwrap();
        let run_date: String = conn
            .query_row(
                "SELECT run_date FROM videos WHERE id = 'abc123def45'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&run_date).is_ok());
    }
}
