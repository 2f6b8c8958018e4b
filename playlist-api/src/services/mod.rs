//! Services sitting between the HTTP handlers and the database layer

pub mod song_service;

pub use song_service::SongService;
