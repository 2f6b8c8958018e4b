//! Song access service
//!
//! Translates between wire songs (`playlist_common::api::Song`) and stored
//! songs, and forwards each call to the record store. There are no rules here
//! beyond field mapping: store errors pass through unchanged, and the only
//! error raised locally is the missing-id precondition on update.

use playlist_common::api::{Song, SongList};
use playlist_common::{Error, Result, SongId};
use std::sync::Arc;
use tracing::{error, info};

use crate::db::{SongFields, SongStore, StoredSong};

pub struct SongService {
    store: Arc<dyn SongStore>,
}

impl SongService {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self { store }
    }

    /// Store a new song. The wire `id` is ignored; the response carries the
    /// id assigned by the store.
    pub async fn create_song(&self, song: Song) -> Result<Song> {
        info!("create_song({:?})", song);

        let stored = self.store.insert(&fields_from_wire(song)).await.map_err(|e| {
            error!("create_song failed: {}", e);
            e
        })?;

        info!("create_song: stored {}", stored.id);
        Ok(to_wire(stored))
    }

    /// Every stored song
    pub async fn list_songs(&self) -> Result<SongList> {
        info!("list_songs()");

        let stored = self.store.find_all().await.map_err(|e| {
            error!("list_songs failed: {}", e);
            e
        })?;

        info!("list_songs: {} songs", stored.len());
        Ok(SongList {
            list: stored.into_iter().map(to_wire).collect(),
        })
    }

    /// Overwrite the five fields of `song.id`.
    ///
    /// The response holds the values the song had *before* this update.
    pub async fn update_song(&self, song: Song) -> Result<Song> {
        info!("update_song({:?})", song);

        if song.id.is_empty() {
            return Err(Error::Precondition(
                "UpdateSong must provide song identifier".to_string(),
            ));
        }

        let id = SongId::parse(&song.id).map_err(|e| {
            error!("update_song: {}", e);
            e
        })?;

        let previous = self
            .store
            .update_by_id(id, &fields_from_wire(song))
            .await
            .map_err(|e| {
                error!("update_song failed: {}", e);
                e
            })?;

        Ok(to_wire(previous))
    }

    /// Remove the song with external id `id`
    pub async fn delete_song(&self, id: &str) -> Result<bool> {
        info!("delete_song({})", id);

        let id = SongId::parse(id).map_err(|e| {
            error!("delete_song: {}", e);
            e
        })?;

        let deleted = self.store.delete_by_id(id).await.map_err(|e| {
            error!("delete_song failed: {}", e);
            e
        })?;

        Ok(deleted)
    }
}

fn fields_from_wire(song: Song) -> SongFields {
    SongFields {
        title: song.title,
        artist: song.artist,
        album: song.album,
        duration: song.duration,
        link: song.link,
    }
}

fn to_wire(stored: StoredSong) -> Song {
    Song {
        id: stored.id.to_string(),
        title: stored.fields.title,
        artist: stored.fields.artist,
        album: stored.fields.album,
        duration: stored.fields.duration,
        link: stored.fields.link,
    }
}
