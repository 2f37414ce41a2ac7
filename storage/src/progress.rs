use manga_reader_common::models;

use crate::{new_id, now, Result, StoreError, Storage};

/// Which column an upsert touches. Every other column keeps its value.
#[derive(Clone, Copy)]
enum ProgressField<'a> {
    Rating(i64),
    Favorite(bool),
    LastRead(&'a str),
}

impl Storage {
    pub async fn get_progress(
        &self,
        user_id: &str,
        manga_id: &str,
    ) -> Result<Option<models::Progress>> {
        let progress = sqlx::query_as::<_, models::Progress>(
            "SELECT * FROM user_manga_progress WHERE user_id = ? AND manga_id = ?",
        )
        .bind(user_id)
        .bind(manga_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(progress)
    }

    pub async fn list_progress(&self, user_id: &str) -> Result<Vec<models::Progress>> {
        let progress = sqlx::query_as::<_, models::Progress>(
            "SELECT * FROM user_manga_progress WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(progress)
    }

    /// Expects a rating already checked to be within 1..=10.
    pub async fn set_rating(
        &self,
        user_id: &str,
        manga_id: &str,
        rating: i64,
    ) -> Result<models::Progress> {
        self.upsert_progress(user_id, manga_id, ProgressField::Rating(rating))
            .await
    }

    pub async fn set_favorite(
        &self,
        user_id: &str,
        manga_id: &str,
        is_favorite: bool,
    ) -> Result<models::Progress> {
        self.upsert_progress(user_id, manga_id, ProgressField::Favorite(is_favorite))
            .await
    }

    pub async fn set_last_read(
        &self,
        user_id: &str,
        manga_id: &str,
        chapter_id: &str,
    ) -> Result<models::Progress> {
        self.upsert_progress(user_id, manga_id, ProgressField::LastRead(chapter_id))
            .await
    }

    async fn upsert_progress(
        &self,
        user_id: &str,
        manga_id: &str,
        field: ProgressField<'_>,
    ) -> Result<models::Progress> {
        self.require_manga(manga_id).await?;

        let (column, sql) = match field {
            ProgressField::Rating(_) => ("rating", "rating = excluded.rating"),
            ProgressField::Favorite(_) => ("is_favorite", "is_favorite = excluded.is_favorite"),
            ProgressField::LastRead(_) => (
                "last_read_chapter",
                "last_read_chapter = excluded.last_read_chapter",
            ),
        };
        let statement = format!(
            "INSERT INTO user_manga_progress (id, user_id, manga_id, {column}, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id, manga_id) DO UPDATE SET {sql}, updated_at = excluded.updated_at"
        );

        let timestamp = now();
        let query = sqlx::query(&statement)
            .bind(new_id())
            .bind(user_id)
            .bind(manga_id);
        let query = match field {
            ProgressField::Rating(rating) => query.bind(rating),
            ProgressField::Favorite(is_favorite) => query.bind(is_favorite),
            ProgressField::LastRead(chapter_id) => query.bind(chapter_id),
        };
        query
            .bind(timestamp)
            .bind(timestamp)
            .execute(&self.pool)
            .await?;

        self.get_progress(user_id, manga_id)
            .await?
            .ok_or(StoreError::NotFound("progress"))
    }
}
