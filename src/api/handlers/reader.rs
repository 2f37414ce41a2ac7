use crate::api::types::{AppError, AppState, CurrentUser};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use manga_reader_common::models::{ChapterDetails, Comment, Manga, Volume};
use manga_reader_common::reader::{navigation, table_of_contents, Navigation, VolumeContents};
use serde::Serialize;

#[derive(Serialize)]
pub struct ReaderView {
    pub manga: Manga,
    pub volume: Volume,
    pub chapter: ChapterDetails,
    pub navigation: Navigation,
    pub contents: Vec<VolumeContents>,
    pub comments: Vec<Comment>,
}

fn chapter_not_found() -> AppError {
    AppError::NotFound("Chapter not found".to_string())
}

pub async fn read_chapter(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((manga_id, chapter_id)): Path<(String, String)>,
) -> Result<Json<ReaderView>, AppError> {
    let storage = &state.storage;

    // 1. The chapter, its title and its volume must all line up
    let chapter = match storage.get_chapter_details(&chapter_id).await {
        Ok(Some(chapter)) if chapter.manga_id == manga_id => chapter,
        Ok(_) => return Err(chapter_not_found()),
        Err(e) => return Err(AppError::store("get chapter", e)),
    };
    let manga = match storage.get_manga(&manga_id).await {
        Ok(Some(manga)) => manga,
        Ok(None) => return Err(chapter_not_found()),
        Err(e) => return Err(AppError::store("get manga", e)),
    };
    let volume = match storage.get_volume(&chapter.volume_id).await {
        Ok(Some(volume)) => volume,
        Ok(None) => return Err(chapter_not_found()),
        Err(e) => return Err(AppError::store("get volume", e)),
    };

    // 2. Neighbours and table of contents across the whole title
    let volumes = storage
        .list_volumes(&manga_id)
        .await
        .map_err(|e| AppError::store("list volumes", e))?;
    let chapters = storage
        .list_chapters(&manga_id)
        .await
        .map_err(|e| AppError::store("list chapters", e))?;
    let navigation = navigation(&chapters, &chapter.id).unwrap_or_default();
    let contents = table_of_contents(&volumes, &chapters, Some(&chapter.id));

    let comments = storage
        .list_comments(&chapter.id)
        .await
        .map_err(|e| AppError::store("list comments", e))?;

    // 3. Remember where the reader is; the page still renders if this fails
    if let Err(e) = storage
        .set_last_read(&current.user.id, &manga_id, &chapter.id)
        .await
    {
        tracing::error!("Failed to record last read chapter: {:?}", e);
    }

    Ok(Json(ReaderView {
        manga,
        volume,
        chapter,
        navigation,
        contents,
        comments,
    }))
}
