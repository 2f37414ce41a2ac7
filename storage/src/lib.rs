use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

mod accounts;
mod catalog;
mod chapters;
mod characters;
mod comments;
mod error;
mod images;
mod progress;
mod reviews;
mod volumes;

pub use catalog::MangaOrder;
pub use error::{Result, StoreError};

#[derive(Clone)]
pub struct Storage {
    pub pool: Pool<Sqlite>,
    pub data_dir: PathBuf,
    // Owns the data dir of an in-memory store; removed with the last clone.
    _scratch: Option<Arc<TempDir>>,
}

impl Storage {
    pub async fn new(data_dir: &str) -> Result<Self> {
        let path = PathBuf::from(data_dir);
        if !path.exists() {
            fs::create_dir_all(&path).await?;
        }

        let db_path = path.join("manga.db");
        let options = SqliteConnectOptions::from_str(&format!(
            "sqlite://{}",
            db_path.to_string_lossy()
        ))?
        .create_if_missing(true)
        .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let storage = Self {
            pool,
            data_dir: path,
            _scratch: None,
        };
        storage.create_schema().await?;
        Ok(storage)
    }

    /// A private database that lives as long as the returned handle.
    /// Images go to a temporary directory deleted along with it.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // One connection that never expires, otherwise the database vanishes.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let scratch = tempfile::Builder::new()
            .prefix("manga-reader-")
            .tempdir()?;

        let storage = Self {
            pool,
            data_dir: scratch.path().to_path_buf(),
            _scratch: Some(Arc::new(scratch)),
        };
        storage.create_schema().await?;
        Ok(storage)
    }

    async fn create_schema(&self) -> Result<()> {
        // Titles
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS manga (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                original_title TEXT,
                description TEXT,
                cover_image TEXT,
                status TEXT NOT NULL DEFAULT 'ongoing'
                    CHECK (status IN ('ongoing', 'completed', 'hiatus')),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS volumes (
                id TEXT PRIMARY KEY,
                manga_id TEXT NOT NULL,
                number INTEGER NOT NULL,
                title TEXT,
                cover_image TEXT,
                created_at INTEGER NOT NULL,
                FOREIGN KEY(manga_id) REFERENCES manga(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chapters (
                id TEXT PRIMARY KEY,
                manga_id TEXT NOT NULL,
                volume_id TEXT NOT NULL,
                number REAL NOT NULL,
                title TEXT,
                created_at INTEGER NOT NULL,
                FOREIGN KEY(manga_id) REFERENCES manga(id) ON DELETE CASCADE,
                FOREIGN KEY(volume_id) REFERENCES volumes(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        // Pages keyed by (chapter_id, sequence_index) so the same reference
        // may appear in several chapters or twice in one.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chapter_pages (
                chapter_id TEXT NOT NULL,
                sequence_index INTEGER NOT NULL,
                reference TEXT NOT NULL,
                PRIMARY KEY (chapter_id, sequence_index),
                FOREIGN KEY(chapter_id) REFERENCES chapters(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS characters (
                id TEXT PRIMARY KEY,
                manga_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                image TEXT,
                created_at INTEGER NOT NULL,
                FOREIGN KEY(manga_id) REFERENCES manga(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        // Accounts
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                is_admin INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        // Reader activity
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reviews (
                id TEXT PRIMARY KEY,
                manga_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                content TEXT NOT NULL,
                rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 10),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY(manga_id) REFERENCES manga(id) ON DELETE CASCADE,
                FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chapter_comments (
                id TEXT PRIMARY KEY,
                chapter_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY(chapter_id) REFERENCES chapters(id) ON DELETE CASCADE,
                FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS user_manga_progress (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                manga_id TEXT NOT NULL,
                last_read_chapter TEXT,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                rating INTEGER CHECK (rating IS NULL OR rating BETWEEN 1 AND 10),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(user_id, manga_id),
                FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY(manga_id) REFERENCES manga(id) ON DELETE CASCADE,
                FOREIGN KEY(last_read_chapter) REFERENCES chapters(id) ON DELETE SET NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_data_dir_is_removed_on_drop() {
        let storage = Storage::in_memory().await.unwrap();
        storage.store_image(b"GIF89a").await.unwrap();
        let data_dir = storage.data_dir.clone();
        assert!(data_dir.join("images").exists());

        let clone = storage.clone();
        drop(storage);
        assert!(data_dir.exists());

        drop(clone);
        assert!(!data_dir.exists());
    }

    #[tokio::test]
    async fn opens_database_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested");

        let storage = Storage::new(data_dir.to_str().unwrap()).await.unwrap();
        assert!(data_dir.join("manga.db").exists());

        // Reopening keeps the schema and rows.
        test_support::manga(&storage, "Berserk").await;
        drop(storage);
        let reopened = Storage::new(data_dir.to_str().unwrap()).await.unwrap();
        let mangas = reopened.list_mangas(MangaOrder::Title).await.unwrap();
        assert_eq!(mangas.len(), 1);
    }
}
