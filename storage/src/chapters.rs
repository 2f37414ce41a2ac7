use manga_reader_common::models;
use manga_reader_common::validation::ChapterDraft;
use sqlx::{Sqlite, Transaction};

use crate::{new_id, now, Result, StoreError, Storage};

impl Storage {
    /// All chapters of a title, ordered by number. This is the list the
    /// reader walks for previous/next.
    pub async fn list_chapters(&self, manga_id: &str) -> Result<Vec<models::ChapterMetadata>> {
        let chapters = sqlx::query_as::<_, models::ChapterMetadata>(
            "SELECT * FROM chapters WHERE manga_id = ? ORDER BY number ASC, created_at ASC",
        )
        .bind(manga_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(chapters)
    }

    pub async fn list_volume_chapters(
        &self,
        volume_id: &str,
    ) -> Result<Vec<models::ChapterMetadata>> {
        let chapters = sqlx::query_as::<_, models::ChapterMetadata>(
            "SELECT * FROM chapters WHERE volume_id = ? ORDER BY number ASC, created_at ASC",
        )
        .bind(volume_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(chapters)
    }

    pub async fn get_chapter(&self, id: &str) -> Result<Option<models::ChapterMetadata>> {
        let chapter =
            sqlx::query_as::<_, models::ChapterMetadata>("SELECT * FROM chapters WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(chapter)
    }

    pub async fn get_chapter_details(&self, id: &str) -> Result<Option<models::ChapterDetails>> {
        let Some(chapter) = self.get_chapter(id).await? else {
            return Ok(None);
        };

        let pages = sqlx::query_as::<_, models::PageMetadata>(
            "SELECT * FROM chapter_pages WHERE chapter_id = ? ORDER BY sequence_index ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|p| p.reference)
        .collect();

        Ok(Some(models::ChapterDetails::new(chapter, pages)))
    }

    /// Inserts a chapter under `volume_id`, which must belong to `manga_id`.
    pub async fn create_chapter(
        &self,
        manga_id: &str,
        volume_id: &str,
        draft: ChapterDraft,
    ) -> Result<String> {
        let volume = self
            .get_volume(volume_id)
            .await?
            .ok_or(StoreError::NotFound("volume"))?;
        if volume.manga_id != manga_id {
            return Err(StoreError::Constraint(format!(
                "volume {} does not belong to manga {}",
                volume_id, manga_id
            )));
        }

        let chapter_id = new_id();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO chapters (id, manga_id, volume_id, number, title, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&chapter_id)
        .bind(manga_id)
        .bind(volume_id)
        .bind(draft.number)
        .bind(&draft.title)
        .bind(now())
        .execute(&mut *tx)
        .await?;

        insert_pages(&mut tx, &chapter_id, &draft.pages).await?;
        tx.commit().await?;

        tracing::info!(
            "Created chapter {} ({} pages) in volume {}",
            draft.number,
            draft.pages.len(),
            volume_id
        );
        Ok(chapter_id)
    }

    /// Updates number and title and replaces the page list.
    pub async fn update_chapter(&self, id: &str, draft: ChapterDraft) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE chapters SET number = ?, title = ? WHERE id = ?")
            .bind(draft.number)
            .bind(&draft.title)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("chapter"));
        }

        sqlx::query("DELETE FROM chapter_pages WHERE chapter_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_pages(&mut tx, id, &draft.pages).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_chapter(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("chapter"));
        }
        tracing::info!("Deleted chapter {}", id);
        Ok(())
    }
}

async fn insert_pages(
    tx: &mut Transaction<'_, Sqlite>,
    chapter_id: &str,
    pages: &[String],
) -> Result<()> {
    for (index, reference) in pages.iter().enumerate() {
        sqlx::query(
            "INSERT INTO chapter_pages (chapter_id, sequence_index, reference) VALUES (?, ?, ?)",
        )
        .bind(chapter_id)
        .bind(index as i64)
        .bind(reference)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
