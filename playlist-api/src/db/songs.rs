//! Song record store
//!
//! Persists song records in the `songs` table, keyed by a generated
//! [`SongId`]. Every operation is bounded by the store timeout and fails with
//! `Error::Timeout` once the bound is exceeded; nothing is retried.

use async_trait::async_trait;
use playlist_common::{Error, Result, SongId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

const SELECT_COLUMNS: &str = "SELECT id, title, artist, album, duration, link FROM songs";

/// The five text fields of a song, without an identifier
///
/// Insert payload, and the full replacement written by an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFields {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: String,
    pub link: String,
}

/// Song as held by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSong {
    pub id: SongId,
    pub fields: SongFields,
}

/// Record store operations
///
/// Malformed identifiers never reach the store: they are rejected as
/// `Error::InvalidId` when the external id is parsed into a [`SongId`].
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Persist a new song under a fresh id and return the stored copy as
    /// read back from the database.
    async fn insert(&self, song: &SongFields) -> Result<StoredSong>;

    /// Every stored song, in storage order. No sort key is applied.
    async fn find_all(&self) -> Result<Vec<StoredSong>>;

    /// Overwrite all five fields of `id`.
    ///
    /// Returns the song as it was *before* the update.
    async fn update_by_id(&self, id: SongId, song: &SongFields) -> Result<StoredSong>;

    /// Remove `id`. `Ok(true)` on success, `Error::NotFound` if absent.
    async fn delete_by_id(&self, id: SongId) -> Result<bool>;
}

/// SQLite-backed [`SongStore`]
#[derive(Clone)]
pub struct SqliteSongStore {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteSongStore {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_by_id(&self, id: SongId) -> Result<Option<StoredSong>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("fetch_by_id"))?;

        row.as_ref().map(song_from_row).transpose()
    }
}

#[async_trait]
impl SongStore for SqliteSongStore {
    async fn insert(&self, song: &SongFields) -> Result<StoredSong> {
        info!("insert({:?})", song);

        bounded("insert", self.timeout, async {
            let id = SongId::generate();

            sqlx::query(
                r#"
                INSERT INTO songs (id, title, artist, album, duration, link)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id.to_string())
            .bind(&song.title)
            .bind(&song.artist)
            .bind(&song.album)
            .bind(&song.duration)
            .bind(&song.link)
            .execute(&self.pool)
            .await
            .map_err(store_error("insert"))?;

            // Return what was persisted, not the input
            self.fetch_by_id(id).await?.ok_or_else(|| {
                error!("Song {} missing right after insert", id);
                Error::Store(format!("Song {} missing after insert", id))
            })
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<StoredSong>> {
        info!("find_all()");

        bounded("find_all", self.timeout, async {
            let rows = sqlx::query(SELECT_COLUMNS)
                .fetch_all(&self.pool)
                .await
                .map_err(store_error("find_all"))?;

            rows.iter().map(song_from_row).collect()
        })
        .await
    }

    async fn update_by_id(&self, id: SongId, song: &SongFields) -> Result<StoredSong> {
        info!("update_by_id({}, {:?})", id, song);

        bounded("update_by_id", self.timeout, async {
            // Take the write lock before reading so concurrent writers queue
            // on the busy timeout instead of failing the lock upgrade
            let mut tx = self
                .pool
                .begin_with("BEGIN IMMEDIATE")
                .await
                .map_err(store_error("update_by_id"))?;

            let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(store_error("update_by_id"))?;

            // Dropping `tx` on the early returns rolls it back
            let previous = match row {
                Some(row) => song_from_row(&row)?,
                None => {
                    warn!("update_by_id: no song with id {}", id);
                    return Err(Error::NotFound(id.to_string()));
                }
            };

            sqlx::query(
                r#"
                UPDATE songs
                SET title = ?, artist = ?, album = ?, duration = ?, link = ?
                WHERE id = ?
                "#,
            )
            .bind(&song.title)
            .bind(&song.artist)
            .bind(&song.album)
            .bind(&song.duration)
            .bind(&song.link)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(store_error("update_by_id"))?;

            tx.commit().await.map_err(store_error("update_by_id"))?;

            Ok(previous)
        })
        .await
    }

    async fn delete_by_id(&self, id: SongId) -> Result<bool> {
        info!("delete_by_id({})", id);

        bounded("delete_by_id", self.timeout, async {
            let row = sqlx::query(
                r#"
                DELETE FROM songs WHERE id = ?
                RETURNING id, title, artist, album, duration, link
                "#,
            )
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("delete_by_id"))?;

            match row {
                Some(row) => {
                    let deleted = song_from_row(&row)?;
                    info!("Deleted song {:?}", deleted);
                    Ok(true)
                }
                None => {
                    warn!("delete_by_id: no song with id {}", id);
                    Err(Error::NotFound(id.to_string()))
                }
            }
        })
        .await
    }
}

/// Run a store operation under `limit`
pub(crate) async fn bounded<T, F>(operation: &str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            error!("{} timed out after {:?}", operation, limit);
            Err(Error::Timeout {
                operation: operation.to_string(),
                seconds: limit.as_secs(),
            })
        }
    }
}

fn store_error(operation: &'static str) -> impl Fn(sqlx::Error) -> Error {
    move |e| {
        error!("{} failed: {}", operation, e);
        Error::from(e)
    }
}

fn song_from_row(row: &SqliteRow) -> Result<StoredSong> {
    let id_str: String = row.try_get("id").map_err(store_error("decode"))?;
    let id = SongId::parse(&id_str).map_err(|e| {
        error!("Stored song has a corrupt id: {}", e);
        Error::Store(format!("Corrupt stored id {:?}", id_str))
    })?;

    Ok(StoredSong {
        id,
        fields: SongFields {
            title: row.try_get("title").map_err(store_error("decode"))?,
            artist: row.try_get("artist").map_err(store_error("decode"))?,
            album: row.try_get("album").map_err(store_error("decode"))?,
            duration: row.try_get("duration").map_err(store_error("decode"))?,
            link: row.try_get("link").map_err(store_error("decode"))?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use playlist_common::config::DatabaseConfig;
    use std::collections::HashSet;

    async fn setup_store() -> SqliteSongStore {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        let pool = db::connect(&config)
            .await
            .expect("Failed to create in-memory database");
        SqliteSongStore::new(pool, config.timeout())
    }

    /// File database with the default multi-connection pool
    async fn setup_file_store() -> (tempfile::TempDir, SqliteSongStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", dir.path().join("songs.db").display()),
            ..Default::default()
        };
        assert!(config.max_connections > 1);

        let pool = db::connect(&config)
            .await
            .expect("Failed to create file database");
        (dir, SqliteSongStore::new(pool, config.timeout()))
    }

    fn fields(title: &str) -> SongFields {
        SongFields {
            title: title.to_string(),
            artist: format!("{} artist", title),
            album: format!("{} album", title),
            duration: "3:30".to_string(),
            link: "123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_returns_stored_copy() {
        let store = setup_store().await;

        let stored = store.insert(&fields("Song1")).await.expect("insert");

        assert_eq!(stored.fields, fields("Song1"));
        let again = store.fetch_by_id(stored.id).await.unwrap().expect("row");
        assert_eq!(again, stored);
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = setup_store().await;

        let mut ids = HashSet::new();
        for i in 0..10 {
            let stored = store.insert(&fields(&format!("Song{}", i))).await.unwrap();
            assert!(ids.insert(stored.id));
        }
    }

    #[tokio::test]
    async fn test_find_all_empty() {
        let store = setup_store().await;

        let songs = store.find_all().await.expect("find_all on empty store");
        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_find_all_returns_every_record() {
        let store = setup_store().await;
        let a = store.insert(&fields("A")).await.unwrap();
        let b = store.insert(&fields("B")).await.unwrap();

        let songs = store.find_all().await.unwrap();

        assert_eq!(songs.len(), 2);
        assert!(songs.contains(&a));
        assert!(songs.contains(&b));
    }

    #[tokio::test]
    async fn test_update_returns_previous_values() {
        let store = setup_store().await;
        let original = store.insert(&fields("Before")).await.unwrap();

        let returned = store
            .update_by_id(original.id, &fields("After"))
            .await
            .expect("update");

        assert_eq!(returned, original);
        let current = store.fetch_by_id(original.id).await.unwrap().unwrap();
        assert_eq!(current.fields, fields("After"));
        assert_eq!(current.id, original.id);
    }

    #[tokio::test]
    async fn test_update_is_full_replace() {
        let store = setup_store().await;
        let original = store.insert(&fields("Full")).await.unwrap();

        store
            .update_by_id(original.id, &SongFields::default())
            .await
            .unwrap();

        let current = store.fetch_by_id(original.id).await.unwrap().unwrap();
        assert_eq!(current.fields, SongFields::default());
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let store = setup_store().await;
        store.insert(&fields("Other")).await.unwrap();

        let err = store
            .update_by_id(SongId::generate(), &fields("X"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        // Nothing else was touched
        let songs = store.find_all().await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].fields, fields("Other"));
    }

    #[tokio::test]
    async fn test_delete_succeeds_exactly_once() {
        let store = setup_store().await;
        let stored = store.insert(&fields("Gone")).await.unwrap();

        assert!(store.delete_by_id(stored.id).await.expect("first delete"));

        let err = store.delete_by_id(stored.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_stored_id_is_store_error() {
        let store = setup_store().await;
        sqlx::query(
            "INSERT INTO songs (id, title, artist, album, duration, link) VALUES ('zzz', '', '', '', '', '')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let err = store.find_all().await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[tokio::test]
    async fn test_missing_table_is_store_error() {
        let store = setup_store().await;
        sqlx::query("DROP TABLE songs")
            .execute(store.pool())
            .await
            .unwrap();

        assert!(matches!(store.find_all().await, Err(Error::Store(_))));
        assert!(matches!(
            store.insert(&fields("X")).await,
            Err(Error::Store(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_of_distinct_songs() {
        let (_dir, store) = setup_file_store().await;

        let mut songs = Vec::new();
        for i in 0..40 {
            songs.push(store.insert(&fields(&format!("Song{}", i))).await.unwrap());
        }

        for round in 0..5 {
            let handles: Vec<_> = songs
                .iter()
                .map(|song| {
                    let store = store.clone();
                    let id = song.id;
                    let title = format!("{} r{}", song.fields.title, round);
                    tokio::spawn(async move { store.update_by_id(id, &fields(&title)).await })
                })
                .collect();

            for handle in handles {
                handle.await.unwrap().expect("update of a distinct song failed");
            }
        }

        let stored = store.find_all().await.unwrap();
        assert_eq!(stored.len(), 40);
        for song in &songs {
            let current = stored.iter().find(|s| s.id == song.id).unwrap();
            assert_eq!(current.fields, fields(&format!("{} r4", song.fields.title)));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_of_one_song_are_serialized() {
        let (_dir, store) = setup_file_store().await;
        let id = store.insert(&fields("Start")).await.unwrap().id;

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.update_by_id(id, &fields(&format!("W{}", i))).await })
            })
            .collect();

        // Each writer sees the state left by exactly one other writer (or the
        // original), so the previous titles are all distinct.
        let mut previous_titles = HashSet::new();
        for handle in handles {
            let previous = handle.await.unwrap().expect("update failed");
            assert!(previous_titles.insert(previous.fields.title));
        }
        assert!(previous_titles.contains("Start"));

        let current = store.fetch_by_id(id).await.unwrap().unwrap();
        assert!(current.fields.title.starts_with('W'));
        assert!(!previous_titles.contains(&current.fields.title));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_and_lists() {
        let (_dir, store) = setup_file_store().await;

        let inserts: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.insert(&fields(&format!("Song{}", i))).await })
            })
            .collect();
        let lists: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.find_all().await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in inserts {
            assert!(ids.insert(handle.await.unwrap().expect("insert failed").id));
        }
        for handle in lists {
            let listed = handle.await.unwrap().expect("find_all failed");
            assert!(listed.len() <= 20);
        }

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 20);
        assert!(all.iter().all(|s| ids.contains(&s.id)));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result: Result<()> = bounded(
            "stuck",
            Duration::from_millis(20),
            std::future::pending(),
        )
        .await;

        match result {
            Err(Error::Timeout { operation, .. }) => assert_eq!(operation, "stuck"),
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let ok: Result<u8> = bounded("fast", Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: Result<u8> = bounded("fast", Duration::from_secs(1), async {
            Err(Error::NotFound("x".to_string()))
        })
        .await;
        assert!(matches!(err, Err(Error::NotFound(_))));
    }
}
