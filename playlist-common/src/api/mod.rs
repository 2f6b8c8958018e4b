//! Remote Interface contract
//!
//! Message types and route paths of the song API. `playlist-api` serves
//! these routes, `playlist-web` calls them. Everything here is plain data;
//! the HTTP framework lives in the service crates.

pub mod types;

pub use types::{
    DeleteSongResponse, ErrorDetail, ErrorResponse, ListSongsRequest, Song, SongIdRequest,
    SongList,
};

/// Route paths of the four unary operations (all `POST`)
pub mod routes {
    pub const CREATE_SONG: &str = "/songs/create";
    pub const LIST_SONGS: &str = "/songs/list";
    pub const UPDATE_SONG: &str = "/songs/update";
    pub const DELETE_SONG: &str = "/songs/delete";
    pub const HEALTH: &str = "/health";
}
