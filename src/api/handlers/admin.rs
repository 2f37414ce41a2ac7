//! Catalogue management. Every route here sits behind the admin gate.
//!
//! Create answers `{ "id": ... }`, update and delete answer `204 No Content`.
//! Deletes cascade to everything below the deleted row, so they must be
//! confirmed with `?confirm=true`.

use crate::api::types::{AppError, AppJson, AppQuery, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use manga_reader_common::models::{ChapterMetadata, Character, Manga, Volume};
use manga_reader_common::validation::{CharacterDraft, ChapterDraft, MangaDraft, VolumeDraft};
use manga_reader_storage::MangaOrder;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize, Default)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

fn require_confirmation(params: &DeleteParams) -> Result<(), AppError> {
    if params.confirm {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Deletion must be confirmed with confirm=true".to_string(),
        ))
    }
}

fn created(id: String) -> Json<serde_json::Value> {
    Json(json!({ "id": id }))
}

// Titles

pub async fn list_mangas(State(state): State<AppState>) -> Result<Json<Vec<Manga>>, AppError> {
    match state.storage.list_mangas(MangaOrder::Title).await {
        Ok(mangas) => Ok(Json(mangas)),
        Err(e) => Err(AppError::store("list mangas", e)),
    }
}

pub async fn create_manga(
    State(state): State<AppState>,
    AppJson(payload): AppJson<MangaDraft>,
) -> Result<Json<serde_json::Value>, AppError> {
    let draft = payload.validate()?;
    match state.storage.create_manga(draft).await {
        Ok(id) => Ok(created(id)),
        Err(e) => Err(AppError::store("create manga", e)),
    }
}

pub async fn update_manga(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<MangaDraft>,
) -> Result<StatusCode, AppError> {
    let draft = payload.validate()?;
    match state.storage.update_manga(&id, draft).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(AppError::store("update manga", e)),
    }
}

pub async fn delete_manga(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<DeleteParams>,
) -> Result<StatusCode, AppError> {
    require_confirmation(&params)?;
    match state.storage.delete_manga(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(AppError::store("delete manga", e)),
    }
}

// Volumes

pub async fn list_volumes(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
) -> Result<Json<Vec<Volume>>, AppError> {
    match state.storage.list_volumes(&manga_id).await {
        Ok(volumes) => Ok(Json(volumes)),
        Err(e) => Err(AppError::store("list volumes", e)),
    }
}

pub async fn create_volume(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
    AppJson(payload): AppJson<VolumeDraft>,
) -> Result<Json<serde_json::Value>, AppError> {
    let draft = payload.validate()?;
    match state.storage.create_volume(&manga_id, draft).await {
        Ok(id) => Ok(created(id)),
        Err(e) => Err(AppError::store("create volume", e)),
    }
}

pub async fn update_volume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<VolumeDraft>,
) -> Result<StatusCode, AppError> {
    let draft = payload.validate()?;
    match state.storage.update_volume(&id, draft).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(AppError::store("update volume", e)),
    }
}

pub async fn delete_volume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<DeleteParams>,
) -> Result<StatusCode, AppError> {
    require_confirmation(&params)?;
    match state.storage.delete_volume(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(AppError::store("delete volume", e)),
    }
}

// Chapters

pub async fn list_chapters(
    State(state): State<AppState>,
    Path(volume_id): Path<String>,
) -> Result<Json<Vec<ChapterMetadata>>, AppError> {
    match state.storage.list_volume_chapters(&volume_id).await {
        Ok(chapters) => Ok(Json(chapters)),
        Err(e) => Err(AppError::store("list chapters", e)),
    }
}

#[derive(Deserialize)]
pub struct CreateChapterRequest {
    /// Defaults to the volume's title. When given it must match.
    pub manga_id: Option<String>,
    pub number: f64,
    pub title: Option<String>,
    #[serde(default)]
    pub pages: Vec<String>,
}

pub async fn create_chapter(
    State(state): State<AppState>,
    Path(volume_id): Path<String>,
    AppJson(payload): AppJson<CreateChapterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let draft = ChapterDraft {
        number: payload.number,
        title: payload.title,
        pages: payload.pages,
    }
    .validate()?;

    let manga_id = match payload.manga_id {
        Some(manga_id) => manga_id,
        None => match state.storage.get_volume(&volume_id).await {
            Ok(Some(volume)) => volume.manga_id,
            Ok(None) => return Err(AppError::NotFound("Volume not found".to_string())),
            Err(e) => return Err(AppError::store("get volume", e)),
        },
    };

    match state
        .storage
        .create_chapter(&manga_id, &volume_id, draft)
        .await
    {
        Ok(id) => Ok(created(id)),
        Err(e) => Err(AppError::store("create chapter", e)),
    }
}

pub async fn update_chapter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ChapterDraft>,
) -> Result<StatusCode, AppError> {
    let draft = payload.validate()?;
    match state.storage.update_chapter(&id, draft).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(AppError::store("update chapter", e)),
    }
}

pub async fn delete_chapter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<DeleteParams>,
) -> Result<StatusCode, AppError> {
    require_confirmation(&params)?;
    match state.storage.delete_chapter(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(AppError::store("delete chapter", e)),
    }
}

// Characters

pub async fn list_characters(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
) -> Result<Json<Vec<Character>>, AppError> {
    match state.storage.list_characters(&manga_id).await {
        Ok(characters) => Ok(Json(characters)),
        Err(e) => Err(AppError::store("list characters", e)),
    }
}

pub async fn create_character(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
    AppJson(payload): AppJson<CharacterDraft>,
) -> Result<Json<serde_json::Value>, AppError> {
    let draft = payload.validate()?;
    match state.storage.create_character(&manga_id, draft).await {
        Ok(id) => Ok(created(id)),
        Err(e) => Err(AppError::store("create character", e)),
    }
}

pub async fn update_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CharacterDraft>,
) -> Result<StatusCode, AppError> {
    let draft = payload.validate()?;
    match state.storage.update_character(&id, draft).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(AppError::store("update character", e)),
    }
}

pub async fn delete_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<DeleteParams>,
) -> Result<StatusCode, AppError> {
    require_confirmation(&params)?;
    match state.storage.delete_character(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(AppError::store("delete character", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_need_explicit_confirmation() {
        assert!(require_confirmation(&DeleteParams::default()).is_err());
        assert!(require_confirmation(&DeleteParams { confirm: true }).is_ok());
    }
}
