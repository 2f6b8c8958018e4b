//! Database access layer for playlist-api
//!
//! One SQLite table, `songs`, holds every record. The schema is created on
//! connect if it doesn't exist yet.

use anyhow::{Context, Result};
use playlist_common::config::DatabaseConfig;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

pub mod songs;
pub use songs::{SongFields, SongStore, SqliteSongStore, StoredSong};

const SONGS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS songs (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        album TEXT NOT NULL,
        duration TEXT NOT NULL,
        link TEXT NOT NULL
    )
"#;

/// Connect to the configured database and make sure the schema exists
///
/// The database file is created if missing and runs in WAL mode. Writers and
/// pool checkouts wait up to the store timeout. An in-memory URL gets a
/// single, never-recycled connection, since every SQLite in-memory connection
/// is its own database.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let in_memory = is_in_memory(&config.url);

    let mut options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database url: {}", config.url))?
        .create_if_missing(true)
        .busy_timeout(config.timeout());
    if !in_memory {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    let max_connections = if in_memory {
        1
    } else {
        config.max_connections.max(1)
    };

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(config.timeout());
    if in_memory {
        // Closing the only connection would drop the database
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to database: {}", config.url))?;

    init_schema(&pool)
        .await
        .context("Failed to initialize database schema")?;

    info!("Database ready ({} max connections)", max_connections);
    Ok(pool)
}

/// Create the `songs` table if it doesn't exist
pub async fn init_schema(pool: &SqlitePool) -> playlist_common::Result<()> {
    sqlx::query(SONGS_SCHEMA).execute(pool).await?;
    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
