//! playlist-web library - HTML form front-end
//!
//! Renders the playlist page and turns form submissions into Remote
//! Interface calls against playlist-api.

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod client;
pub mod error;
pub mod handlers;
pub mod render;

pub use crate::client::SongApiClient;
pub use crate::error::WebError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<SongApiClient>,
}

impl AppState {
    pub fn new(client: SongApiClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/playlist", get(handlers::playlist))
        .route("/create", post(handlers::create))
        .route("/update", post(handlers::update))
        .route("/delete", get(handlers::delete))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
        .with_state(state)
}
