use crate::api::types::{AppError, AppJson, AppState, CurrentUser};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use manga_reader_common::models::Review;
use manga_reader_common::validation::validate_review;
use serde::Deserialize;

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    match state.storage.get_manga(&manga_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(AppError::NotFound("Manga not found".to_string())),
        Err(e) => return Err(AppError::store("get manga", e)),
    }

    match state.storage.list_reviews(&manga_id).await {
        Ok(reviews) => Ok(Json(reviews)),
        Err(e) => Err(AppError::store("list reviews", e)),
    }
}

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub rating: i64,
}

pub async fn create_review(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(manga_id): Path<String>,
    AppJson(payload): AppJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let (content, rating) = validate_review(&payload.content, payload.rating)?;

    match state
        .storage
        .create_review(&manga_id, &current.user.id, &content, rating)
        .await
    {
        Ok(review) => Ok((StatusCode::CREATED, Json(review))),
        Err(e) => Err(AppError::store("create review", e)),
    }
}
