//! Form front-end handlers
//!
//! Form posts and the delete link call the Remote Interface and redirect
//! back to `/playlist` with `303 See Other`.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use playlist_common::api::Song;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::WebError;
use crate::render::render_page;
use crate::AppState;

const PLAYLIST_PATH: &str = "/playlist";

/// Fields posted by the add-track and update forms
///
/// Missing fields are empty strings; `id` is only sent by the update form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SongForm {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: String,
    pub link: String,
}

impl From<SongForm> for Song {
    fn from(form: SongForm) -> Self {
        Song {
            id: form.id,
            title: form.title,
            artist: form.artist,
            album: form.album,
            duration: form.duration,
            link: form.link,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteParams {
    pub id: String,
}

/// GET /
pub async fn index() -> Html<String> {
    Html(render_page(None))
}

/// GET /playlist
pub async fn playlist(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let songs = state.client.list_songs().await.map_err(|e| {
        error!("Failed to fetch songs: {}", e);
        WebError::Fetch(e)
    })?;
    Ok(Html(render_page(Some(songs.as_slice()))))
}

/// POST /create
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<SongForm>,
) -> Result<Redirect, WebError> {
    let mut song = Song::from(form);
    song.id.clear();

    let created = state.client.create_song(&song).await.map_err(|e| {
        error!("Failed to create song: {}", e);
        WebError::Create(e)
    })?;
    info!(id = %created.id, title = %created.title, "Song created");

    Ok(Redirect::to(PLAYLIST_PATH))
}

/// POST /update
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<SongForm>,
) -> Result<Redirect, WebError> {
    let song = Song::from(form);

    state.client.update_song(&song).await.map_err(|e| {
        error!(id = %song.id, "Failed to update song: {}", e);
        WebError::Update(e)
    })?;
    info!(id = %song.id, "Song updated");

    Ok(Redirect::to(PLAYLIST_PATH))
}

/// GET /delete?id=
pub async fn delete(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Redirect, WebError> {
    state.client.delete_song(&params.id).await.map_err(|e| {
        error!(id = %params.id, "Failed to delete song: {}", e);
        WebError::Delete(e)
    })?;
    info!(id = %params.id, "Song deleted");

    Ok(Redirect::to(PLAYLIST_PATH))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "playlist-web".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
