use manga_reader_common::models;
use manga_reader_common::validation::VolumeDraft;

use crate::{new_id, now, Result, StoreError, Storage};

impl Storage {
    pub async fn list_volumes(&self, manga_id: &str) -> Result<Vec<models::Volume>> {
        let volumes = sqlx::query_as::<_, models::Volume>(
            "SELECT * FROM volumes WHERE manga_id = ? ORDER BY number ASC, created_at ASC",
        )
        .bind(manga_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(volumes)
    }

    pub async fn get_volume(&self, id: &str) -> Result<Option<models::Volume>> {
        let volume = sqlx::query_as::<_, models::Volume>("SELECT * FROM volumes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(volume)
    }

    pub async fn create_volume(&self, manga_id: &str, draft: VolumeDraft) -> Result<String> {
        self.require_manga(manga_id).await?;

        let volume_id = new_id();
        sqlx::query(
            "INSERT INTO volumes (id, manga_id, number, title, cover_image, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&volume_id)
        .bind(manga_id)
        .bind(draft.number)
        .bind(&draft.title)
        .bind(&draft.cover_image)
        .bind(now())
        .execute(&self.pool)
        .await?;

        tracing::info!("Created volume {} for manga {}", draft.number, manga_id);
        Ok(volume_id)
    }

    pub async fn update_volume(&self, id: &str, draft: VolumeDraft) -> Result<()> {
        let result =
            sqlx::query("UPDATE volumes SET number = ?, title = ?, cover_image = ? WHERE id = ?")
                .bind(draft.number)
                .bind(&draft.title)
                .bind(&draft.cover_image)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("volume"));
        }
        Ok(())
    }

    /// Removes the volume and its chapters.
    pub async fn delete_volume(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM volumes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("volume"));
        }
        tracing::info!("Deleted volume {}", id);
        Ok(())
    }
}
