use crate::api::types::{AppError, AppJson, AppState, CurrentUser};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use manga_reader_common::models::Progress;
use manga_reader_common::validation::validate_rating;
use serde::Deserialize;

pub async fn get_progress(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(manga_id): Path<String>,
) -> Result<Json<Option<Progress>>, AppError> {
    match state.storage.get_progress(&current.user.id, &manga_id).await {
        Ok(progress) => Ok(Json(progress)),
        Err(e) => Err(AppError::store("get progress", e)),
    }
}

#[derive(Deserialize)]
pub struct RatingRequest {
    pub rating: i64,
}

pub async fn set_rating(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(manga_id): Path<String>,
    AppJson(payload): AppJson<RatingRequest>,
) -> Result<Json<Progress>, AppError> {
    let rating = validate_rating(payload.rating)?;

    match state
        .storage
        .set_rating(&current.user.id, &manga_id, rating)
        .await
    {
        Ok(progress) => Ok(Json(progress)),
        Err(e) => Err(AppError::store("set rating", e)),
    }
}

#[derive(Deserialize)]
pub struct FavoriteRequest {
    pub is_favorite: bool,
}

pub async fn set_favorite(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(manga_id): Path<String>,
    AppJson(payload): AppJson<FavoriteRequest>,
) -> Result<Json<Progress>, AppError> {
    match state
        .storage
        .set_favorite(&current.user.id, &manga_id, payload.is_favorite)
        .await
    {
        Ok(progress) => Ok(Json(progress)),
        Err(e) => Err(AppError::store("set favorite", e)),
    }
}
