use crate::api::types::{AppError, AppState, CurrentUser};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use manga_reader_common::models::{Character, Manga, Progress, Review};
use manga_reader_common::reader::{average_rating, table_of_contents, ChapterLink, VolumeContents};
use manga_reader_storage::MangaOrder;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
pub struct CatalogEntry {
    pub manga: Manga,
    pub progress: Option<Progress>,
}

pub async fn list_mangas(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    let mangas = match state.storage.list_mangas(MangaOrder::UpdatedDesc).await {
        Ok(mangas) => mangas,
        Err(e) => return Err(AppError::store("list mangas", e)),
    };

    let mut progress: HashMap<String, Progress> = match state
        .storage
        .list_progress(&current.user.id)
        .await
    {
        Ok(rows) => rows.into_iter().map(|p| (p.manga_id.clone(), p)).collect(),
        Err(e) => return Err(AppError::store("list progress", e)),
    };

    let entries = mangas
        .into_iter()
        .map(|manga| CatalogEntry {
            progress: progress.remove(&manga.id),
            manga,
        })
        .collect();
    Ok(Json(entries))
}

#[derive(Serialize)]
pub struct MangaDetail {
    pub manga: Manga,
    pub contents: Vec<VolumeContents>,
    pub characters: Vec<Character>,
    pub reviews: Vec<Review>,
    pub review_count: usize,
    pub average_rating: Option<f64>,
    pub progress: Option<Progress>,
    pub first_chapter: Option<ChapterLink>,
}

pub async fn get_manga(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<MangaDetail>, AppError> {
    let manga = match state.storage.get_manga(&id).await {
        Ok(Some(manga)) => manga,
        Ok(None) => return Err(AppError::NotFound("Manga not found".to_string())),
        Err(e) => return Err(AppError::store("get manga", e)),
    };

    let storage = &state.storage;
    let volumes = storage
        .list_volumes(&id)
        .await
        .map_err(|e| AppError::store("list volumes", e))?;
    let chapters = storage
        .list_chapters(&id)
        .await
        .map_err(|e| AppError::store("list chapters", e))?;
    let characters = storage
        .list_characters(&id)
        .await
        .map_err(|e| AppError::store("list characters", e))?;
    let reviews = storage
        .list_reviews(&id)
        .await
        .map_err(|e| AppError::store("list reviews", e))?;
    let progress = storage
        .get_progress(&current.user.id, &id)
        .await
        .map_err(|e| AppError::store("get progress", e))?;

    Ok(Json(MangaDetail {
        manga,
        contents: table_of_contents(&volumes, &chapters, None),
        characters,
        review_count: reviews.len(),
        average_rating: average_rating(reviews.iter().map(|r| r.rating)),
        reviews,
        progress,
        first_chapter: chapters.first().map(ChapterLink::from),
    }))
}
