use manga_reader_common::models;
use manga_reader_common::validation::MangaDraft;

use crate::{new_id, now, Result, StoreError, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MangaOrder {
    /// Most recently updated first; the catalog order.
    UpdatedDesc,
    /// Alphabetical; the admin panel order.
    Title,
}

impl Storage {
    pub async fn list_mangas(&self, order: MangaOrder) -> Result<Vec<models::Manga>> {
        let sql = match order {
            MangaOrder::UpdatedDesc => "SELECT * FROM manga ORDER BY updated_at DESC, created_at DESC",
            MangaOrder::Title => "SELECT * FROM manga ORDER BY title COLLATE NOCASE ASC",
        };
        let mangas = sqlx::query_as::<_, models::Manga>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(mangas)
    }

    pub async fn get_manga(&self, id: &str) -> Result<Option<models::Manga>> {
        let manga = sqlx::query_as::<_, models::Manga>("SELECT * FROM manga WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(manga)
    }

    pub async fn create_manga(&self, draft: MangaDraft) -> Result<String> {
        let manga_id = new_id();
        let created_at = now();

        sqlx::query(
            "INSERT INTO manga (id, title, original_title, description, cover_image, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&manga_id)
        .bind(&draft.title)
        .bind(&draft.original_title)
        .bind(&draft.description)
        .bind(&draft.cover_image)
        .bind(draft.status)
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!("Created manga {} ({})", draft.title, manga_id);
        Ok(manga_id)
    }

    pub async fn update_manga(&self, id: &str, draft: MangaDraft) -> Result<()> {
        let result = sqlx::query(
            "UPDATE manga SET title = ?, original_title = ?, description = ?, cover_image = ?, status = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&draft.title)
        .bind(&draft.original_title)
        .bind(&draft.description)
        .bind(&draft.cover_image)
        .bind(draft.status)
        .bind(now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("manga"));
        }
        Ok(())
    }

    /// Removes the title together with everything that hangs off it.
    pub async fn delete_manga(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM manga WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("manga"));
        }
        tracing::info!("Deleted manga {}", id);
        Ok(())
    }

    pub(crate) async fn require_manga(&self, id: &str) -> Result<models::Manga> {
        self.get_manga(id).await?.ok_or(StoreError::NotFound("manga"))
    }
}
