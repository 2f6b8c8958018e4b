//! Song API: the four unary Remote Interface operations
//!
//! Each handler decodes one message, calls the access service and encodes
//! its answer. All routes are `POST` with JSON bodies.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use playlist_common::api::{DeleteSongResponse, Song, SongIdRequest, SongList};

use crate::error::ApiResult;
use crate::AppState;

/// POST /songs/create
pub async fn create_song(
    State(state): State<AppState>,
    payload: Result<Json<Song>, JsonRejection>,
) -> ApiResult<Json<Song>> {
    let Json(song) = payload?;
    Ok(Json(state.songs.create_song(song).await?))
}

/// POST /songs/list
///
/// Takes no parameters; any request body is ignored.
pub async fn list_songs(State(state): State<AppState>) -> ApiResult<Json<SongList>> {
    Ok(Json(state.songs.list_songs().await?))
}

/// POST /songs/update
///
/// Responds with the song as it was before the update.
pub async fn update_song(
    State(state): State<AppState>,
    payload: Result<Json<Song>, JsonRejection>,
) -> ApiResult<Json<Song>> {
    let Json(song) = payload?;
    Ok(Json(state.songs.update_song(song).await?))
}

/// POST /songs/delete
pub async fn delete_song(
    State(state): State<AppState>,
    payload: Result<Json<SongIdRequest>, JsonRejection>,
) -> ApiResult<Json<DeleteSongResponse>> {
    let Json(request) = payload?;
    let value = state.songs.delete_song(&request.value).await?;
    Ok(Json(DeleteSongResponse { value }))
}
