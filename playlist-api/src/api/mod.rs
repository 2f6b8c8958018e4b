//! HTTP API handlers for playlist-api

pub mod health;
pub mod songs;

pub use health::health_routes;
pub use songs::{create_song, delete_song, list_songs, update_song};
