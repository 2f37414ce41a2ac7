use manga_reader_common::models;

use crate::{new_id, now, Result, StoreError, Storage};

const COMMENT_SELECT: &str = "SELECT c.id, c.chapter_id, c.user_id, c.content, c.created_at, u.email AS author_email
     FROM chapter_comments c JOIN users u ON u.id = c.user_id";

impl Storage {
    /// Comments on a chapter, newest first.
    pub async fn list_comments(&self, chapter_id: &str) -> Result<Vec<models::Comment>> {
        let comments = sqlx::query_as::<_, models::Comment>(&format!(
            "{COMMENT_SELECT} WHERE c.chapter_id = ? ORDER BY c.created_at DESC, c.rowid DESC"
        ))
        .bind(chapter_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    pub async fn create_comment(
        &self,
        chapter_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<models::Comment> {
        if self.get_chapter(chapter_id).await?.is_none() {
            return Err(StoreError::NotFound("chapter"));
        }

        let comment_id = new_id();
        sqlx::query(
            "INSERT INTO chapter_comments (id, chapter_id, user_id, content, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&comment_id)
        .bind(chapter_id)
        .bind(user_id)
        .bind(content)
        .bind(now())
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, models::Comment>(&format!("{COMMENT_SELECT} WHERE c.id = ?"))
            .bind(&comment_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("comment"))
    }
}
