//! # Playlist Common Library
//!
//! Shared code for the playlist services:
//! - Error taxonomy (`Error`, `Result`)
//! - Song identifiers
//! - Remote Interface message types and routes
//! - Configuration profile loading

pub mod api;
pub mod config;
pub mod error;
pub mod song_id;

pub use error::{Error, Result};
pub use song_id::SongId;
