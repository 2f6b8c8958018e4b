//! Remote Interface client
//!
//! Typed wrapper over the playlist-api HTTP routes. Failed calls come back as
//! the same `playlist_common::Error` variant the service raised, decoded from
//! the error body's `code`.

use std::time::Duration;

use playlist_common::api::{
    routes, DeleteSongResponse, ErrorResponse, ListSongsRequest, Song, SongIdRequest, SongList,
};
use playlist_common::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};

const USER_AGENT: &str = concat!("playlist-web/", env!("CARGO_PKG_VERSION"));

/// Per-request bound; exceeds the record store bound so the service gets to
/// report its own timeout first.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(75);

/// Song API client
#[derive(Debug, Clone)]
pub struct SongApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SongApiClient {
    /// Client for the service at `base_url`, e.g. `http://127.0.0.1:50051`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store a new song; the returned song carries the assigned id
    pub async fn create_song(&self, song: &Song) -> Result<Song> {
        self.call(routes::CREATE_SONG, song).await
    }

    pub async fn list_songs(&self) -> Result<Vec<Song>> {
        let list: SongList = self.call(routes::LIST_SONGS, &ListSongsRequest {}).await?;
        Ok(list.list)
    }

    /// Replace the fields of the song with `song.id`
    ///
    /// Returns the song as it was before the update.
    pub async fn update_song(&self, song: &Song) -> Result<Song> {
        self.call(routes::UPDATE_SONG, song).await
    }

    pub async fn delete_song(&self, id: &str) -> Result<bool> {
        let request = SongIdRequest {
            value: id.to_string(),
        };
        let response: DeleteSongResponse = self.call(routes::DELETE_SONG, &request).await?;
        Ok(response.value)
    }

    async fn call<Req, Resp>(&self, route: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, route);
        tracing::debug!(url = %url, "Calling song API");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(decode_error(status, &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Invalid response from {}: {}", route, e)))
    }
}

/// Error raised by the service, or a transport error if the body is not an
/// error message
fn decode_error(status: reqwest::StatusCode, body: &str) -> Error {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(response) => response.into_error(),
        Err(_) => Error::Transport(format!("HTTP {}: {}", status, body)),
    }
}
