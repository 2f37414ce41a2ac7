use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MangaStatus {
    #[default]
    Ongoing,
    Completed,
    Hiatus,
}

#[derive(Debug, Serialize, Deserialize, FromRow, PartialEq, Eq, Clone)]
pub struct Manga {
    pub id: String,
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub status: MangaStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, PartialEq, Eq, Clone)]
pub struct Volume {
    pub id: String,
    pub manga_id: String,
    pub number: i64,
    pub title: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct ChapterMetadata {
    pub id: String,
    pub manga_id: String,
    pub volume_id: String,
    pub number: f64,
    pub title: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChapterDetails {
    pub id: String,
    pub manga_id: String,
    pub volume_id: String,
    pub number: f64,
    pub title: Option<String>,
    pub created_at: i64,
    pub pages: Vec<String>,
}

impl ChapterDetails {
    pub fn new(chapter: ChapterMetadata, pages: Vec<String>) -> Self {
        Self {
            id: chapter.id,
            manga_id: chapter.manga_id,
            volume_id: chapter.volume_id,
            number: chapter.number,
            title: chapter.title,
            created_at: chapter.created_at,
            pages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct PageMetadata {
    pub chapter_id: String,
    pub sequence_index: i64,
    pub reference: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow, PartialEq, Eq, Clone)]
pub struct Character {
    pub id: String,
    pub manga_id: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: i64,
}

/// A review joined with its author's email, the shape every screen shows.
#[derive(Debug, Serialize, Deserialize, FromRow, PartialEq, Eq, Clone)]
pub struct Review {
    pub id: String,
    pub manga_id: String,
    pub user_id: String,
    pub content: String,
    pub rating: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub author_email: String,
}

/// A chapter comment joined with its author's email.
#[derive(Debug, Serialize, Deserialize, FromRow, PartialEq, Eq, Clone)]
pub struct Comment {
    pub id: String,
    pub chapter_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: i64,
    pub author_email: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow, PartialEq, Eq, Clone)]
pub struct Progress {
    pub id: String,
    pub user_id: String,
    pub manga_id: String,
    pub last_read_chapter: Option<String>,
    pub is_favorite: bool,
    pub rating: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public view of an account. Credentials never leave the store.
#[derive(Debug, Serialize, Deserialize, FromRow, PartialEq, Eq, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: i64,
    pub expires_at: i64,
}
