use manga_reader_common::models;
use manga_reader_common::validation::CharacterDraft;

use crate::{new_id, now, Result, StoreError, Storage};

impl Storage {
    pub async fn list_characters(&self, manga_id: &str) -> Result<Vec<models::Character>> {
        let characters = sqlx::query_as::<_, models::Character>(
            "SELECT * FROM characters WHERE manga_id = ? ORDER BY created_at ASC, name ASC",
        )
        .bind(manga_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(characters)
    }

    pub async fn create_character(&self, manga_id: &str, draft: CharacterDraft) -> Result<String> {
        self.require_manga(manga_id).await?;

        let character_id = new_id();
        sqlx::query(
            "INSERT INTO characters (id, manga_id, name, description, image, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&character_id)
        .bind(manga_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.image)
        .bind(now())
        .execute(&self.pool)
        .await?;

        Ok(character_id)
    }

    pub async fn update_character(&self, id: &str, draft: CharacterDraft) -> Result<()> {
        let result =
            sqlx::query("UPDATE characters SET name = ?, description = ?, image = ? WHERE id = ?")
                .bind(&draft.name)
                .bind(&draft.description)
                .bind(&draft.image)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("character"));
        }
        Ok(())
    }

    pub async fn delete_character(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("character"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn cast_belongs_to_title() {
        let storage = test_support::storage().await;
        let manga = test_support::manga(&storage, "Monster").await;
        let other = test_support::manga(&storage, "Pluto").await;

        let id = storage
            .create_character(
                &manga.id,
                CharacterDraft {
                    name: "Kenzo Tenma".into(),
                    description: Some("Neurosurgeon".into()),
                    image: None,
                },
            )
            .await
            .unwrap();
        storage
            .create_character(
                &other.id,
                CharacterDraft {
                    name: "Gesicht".into(),
                    description: None,
                    image: None,
                },
            )
            .await
            .unwrap();

        let cast = storage.list_characters(&manga.id).await.unwrap();
        assert_eq!(cast.len(), 1);
        assert_eq!(cast[0].id, id);

        storage
            .update_character(
                &id,
                CharacterDraft {
                    name: "Dr. Tenma".into(),
                    description: None,
                    image: Some("/images/abc".into()),
                },
            )
            .await
            .unwrap();
        let cast = storage.list_characters(&manga.id).await.unwrap();
        assert_eq!(cast[0].name, "Dr. Tenma");
        assert_eq!(cast[0].description, None);

        storage.delete_character(&id).await.unwrap();
        assert!(storage.list_characters(&manga.id).await.unwrap().is_empty());
    }
}
