use crate::api::types::{AppError, AppJson, AppState, CurrentUser};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use manga_reader_common::models::Comment;
use manga_reader_common::validation::validate_comment;
use serde::Deserialize;

pub async fn list_comments(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    match state.storage.get_chapter(&chapter_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(AppError::NotFound("Chapter not found".to_string())),
        Err(e) => return Err(AppError::store("get chapter", e)),
    }

    match state.storage.list_comments(&chapter_id).await {
        Ok(comments) => Ok(Json(comments)),
        Err(e) => Err(AppError::store("list comments", e)),
    }
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: String,
}

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(chapter_id): Path<String>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let content = validate_comment(&payload.content)?;

    match state
        .storage
        .create_comment(&chapter_id, &current.user.id, &content)
        .await
    {
        Ok(comment) => Ok((StatusCode::CREATED, Json(comment))),
        Err(e) => Err(AppError::store("create comment", e)),
    }
}
