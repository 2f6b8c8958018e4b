//! playlist-api library - song record service
//!
//! Record store over SQLite, the access service on top of it, and the HTTP
//! Remote Interface exposing create / list / update / delete.

use axum::Router;
use playlist_common::api::routes;
use playlist_common::config::DatabaseConfig;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use crate::db::SqliteSongStore;
use crate::services::SongService;

/// Application state shared across HTTP handlers
///
/// Holds no mutable state; everything lives in the record store.
#[derive(Clone)]
pub struct AppState {
    pub songs: Arc<SongService>,
}

impl AppState {
    pub fn new(songs: Arc<SongService>) -> Self {
        Self { songs }
    }

    /// State backed by a SQLite pool, with the configured store timeout
    pub fn from_pool(pool: SqlitePool, database: &DatabaseConfig) -> Self {
        let store = SqliteSongStore::new(pool, database.timeout());
        Self::new(Arc::new(SongService::new(Arc::new(store))))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    let songs = Router::new()
        .route(routes::CREATE_SONG, post(api::create_song))
        .route(routes::LIST_SONGS, post(api::list_songs))
        .route(routes::UPDATE_SONG, post(api::update_song))
        .route(routes::DELETE_SONG, post(api::delete_song));

    Router::new()
        .merge(songs)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
        .with_state(state)
}
