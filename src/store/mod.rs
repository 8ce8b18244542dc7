//! Persistent video knowledge store.
//!
//! A single `videos` table keyed by the dedup id. Records are created exactly
//! once per unique id and never updated or deleted by this system.

mod sqlite;

pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};

/// A persisted video record.
///
/// `source` carries a fixed tag ("YouTube", "Local") for those kinds and the
/// raw stream URL for M3U8 entries; the split is intentional and matches what
/// downstream consumers key on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Dedup key; primary key in the store.
    pub id: String,
    /// Human-readable label; may be empty.
    pub title: String,
    /// Transcript text.
    pub content: String,
    /// Attributed author or channel.
    pub creator: String,
    /// Origin tag or raw stream URL.
    pub source: String,
    /// Publication date when available, else empty.
    pub upload_date: String,
}

impl VideoRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            creator: String::new(),
            source: String::new(),
            upload_date: String::new(),
        }
    }
}

/// Store-level statistics for the read-only `stats` command.
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Total number of persisted records.
    pub video_count: usize,
    /// Title of the most recently inserted record, if any.
    pub latest_title: Option<String>,
}
