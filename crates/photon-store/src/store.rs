//! Store implementation over rusqlite.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, Row};
use serde::Serialize;
use tracing::{debug, info};

use photon_types::GenerationItem;

use crate::error::{Error, Result};

/// A cached completed generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRecord {
    /// Vendor job id.
    pub id: String,
    /// Prompt at the time the job completed.
    pub prompt: String,
    /// State when first cached.
    pub state: String,
    /// Vendor creation timestamp.
    pub created_at: DateTime<Utc>,
    /// First-seen completed video URL.
    pub video_url: String,
}

/// Generation cache backed by SQLite.
///
/// Uses a single connection behind a mutex; the façade's request model is
/// sequential so contention is not a concern.
pub struct GenerationStore {
    conn: Mutex<Connection>,
}

impl GenerationStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("Generation store opened at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS generations (
                id TEXT PRIMARY KEY,
                prompt TEXT NOT NULL,
                state TEXT NOT NULL,
                created_at TEXT NOT NULL,
                video_url TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(())
    }

    /// Cache every item that carries a non-empty video URL.
    ///
    /// Existing rows are left untouched (insert-once), making repeated
    /// syncs idempotent. Returns the number of rows actually inserted.
    pub fn record_completed(&self, items: &[GenerationItem]) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let mut inserted = 0;

        for item in items {
            let Some(video_url) = item.completed_video_url() else {
                continue;
            };

            inserted += conn.execute(
                r#"
                INSERT OR IGNORE INTO generations (id, prompt, state, created_at, video_url)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    item.id,
                    item.prompt,
                    item.state.to_string(),
                    item.created_at.to_rfc3339(),
                    video_url,
                ],
            )?;
        }

        if inserted > 0 {
            debug!(inserted, "Cached completed generations");
        }
        Ok(inserted)
    }

    /// Look up a cached generation by id.
    pub fn find_by_id(&self, id: &str) -> Result<Option<GenerationRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, prompt, state, created_at, video_url FROM generations WHERE id = ?1",
        )?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_record(row)?)),
            None => Ok(None),
        }
    }

    /// Number of cached rows.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM generations", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn row_to_record(row: &Row<'_>) -> Result<GenerationRecord> {
        let id: String = row.get(0)?;
        let created_at_raw: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
            .map_err(|source| Error::Timestamp {
                id: id.clone(),
                source,
            })?
            .with_timezone(&Utc);

        Ok(GenerationRecord {
            id,
            prompt: row.get(1)?,
            state: row.get(2)?,
            created_at,
            video_url: row.get(4)?,
        })
    }
}

impl std::fmt::Debug for GenerationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photon_types::{GenerationState, Video};

    fn item(id: &str, state: GenerationState, video_url: Option<&str>) -> GenerationItem {
        GenerationItem {
            id: id.to_string(),
            prompt: "a cat".to_string(),
            state,
            created_at: Utc::now(),
            video: video_url.map(|url| Video {
                url: url.to_string(),
                width: None,
                height: None,
                thumbnail: None,
            }),
            liked: None,
            estimate_wait_seconds: None,
        }
    }

    #[test]
    fn test_record_completed_inserts_items_with_video() {
        let store = GenerationStore::open_in_memory().unwrap();

        let inserted = store
            .record_completed(&[
                item("gen-1", GenerationState::Completed, Some("https://x/y.mp4")),
                item("gen-2", GenerationState::Pending, None),
            ])
            .unwrap();

        assert_eq!(inserted, 1);
        let record = store.find_by_id("gen-1").unwrap().unwrap();
        assert_eq!(record.video_url, "https://x/y.mp4");
        assert_eq!(record.state, "completed");
    }

    #[test]
    fn test_record_completed_is_idempotent() {
        let store = GenerationStore::open_in_memory().unwrap();
        let completed = item("gen-1", GenerationState::Completed, Some("https://x/y.mp4"));

        assert_eq!(store.record_completed(&[completed.clone()]).unwrap(), 1);
        assert_eq!(store.record_completed(&[completed]).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_first_seen_url_is_never_updated() {
        let store = GenerationStore::open_in_memory().unwrap();

        let mut first = item("gen-1", GenerationState::Completed, Some("https://x/v1.mp4"));
        store.record_completed(std::slice::from_ref(&first)).unwrap();

        // Vendor later reports a different URL for the same id.
        first.video.as_mut().unwrap().url = "https://x/v2.mp4".to_string();
        store.record_completed(&[first]).unwrap();

        let record = store.find_by_id("gen-1").unwrap().unwrap();
        assert_eq!(record.video_url, "https://x/v1.mp4");
    }

    #[test]
    fn test_no_video_url_never_produces_a_row() {
        let store = GenerationStore::open_in_memory().unwrap();

        store
            .record_completed(&[
                item("gen-1", GenerationState::Processing, None),
                item("gen-2", GenerationState::Completed, Some("")),
            ])
            .unwrap();

        assert_eq!(store.count().unwrap(), 0);
        assert!(store.find_by_id("gen-2").unwrap().is_none());
    }

    #[test]
    fn test_find_missing_id_is_none() {
        let store = GenerationStore::open_in_memory().unwrap();
        assert!(store.find_by_id("nope").unwrap().is_none());
    }

    #[test]
    fn test_open_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data/generations.db");

        {
            let store = GenerationStore::open(&db_path).unwrap();
            store
                .record_completed(&[item(
                    "gen-1",
                    GenerationState::Completed,
                    Some("https://x/y.mp4"),
                )])
                .unwrap();
        }

        let reopened = GenerationStore::open(&db_path).unwrap();
        assert!(reopened.find_by_id("gen-1").unwrap().is_some());
    }
}
