use manga_reader_common::models;

use crate::{new_id, now, Result, StoreError, Storage};

const REVIEW_SELECT: &str = "SELECT r.id, r.manga_id, r.user_id, r.content, r.rating, r.created_at, r.updated_at, u.email AS author_email
     FROM reviews r JOIN users u ON u.id = r.user_id";

impl Storage {
    /// Reviews of a title with their authors, oldest first.
    pub async fn list_reviews(&self, manga_id: &str) -> Result<Vec<models::Review>> {
        let reviews = sqlx::query_as::<_, models::Review>(&format!(
            "{REVIEW_SELECT} WHERE r.manga_id = ? ORDER BY r.created_at ASC, r.rowid ASC"
        ))
        .bind(manga_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    /// Expects content and rating already validated. Returns the stored row
    /// with its author so the caller can show it right away.
    pub async fn create_review(
        &self,
        manga_id: &str,
        user_id: &str,
        content: &str,
        rating: i64,
    ) -> Result<models::Review> {
        self.require_manga(manga_id).await?;

        let review_id = new_id();
        let created_at = now();
        sqlx::query(
            "INSERT INTO reviews (id, manga_id, user_id, content, rating, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&review_id)
        .bind(manga_id)
        .bind(user_id)
        .bind(content)
        .bind(rating)
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, models::Review>(&format!("{REVIEW_SELECT} WHERE r.id = ?"))
            .bind(&review_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("review"))
    }
}
