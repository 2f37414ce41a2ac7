//! Input checks applied before anything is written.
//!
//! Drafts are the payloads of the admin forms. `validate()` consumes the raw
//! draft and returns a normalized copy: blank optional fields become `None`
//! and blank page references are dropped.

use serde::Deserialize;
use thiserror::Error;

use crate::models::MangaStatus;
use crate::utils::non_blank;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("rating must be between 1 and 10, got {0}")]
    RatingOutOfRange(i64),

    #[error("{field} must be at least 1")]
    NumberTooSmall { field: &'static str },

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}

pub fn validate_rating(rating: i64) -> Result<i64, ValidationError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(ValidationError::RatingOutOfRange(rating))
    }
}

/// A review needs both text and a star rating. A rating of 0 means the
/// reader never picked one.
pub fn validate_review(content: &str, rating: i64) -> Result<(String, i64), ValidationError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::Missing("review text"));
    }
    if rating == 0 {
        return Err(ValidationError::Missing("rating"));
    }
    Ok((content.to_string(), validate_rating(rating)?))
}

pub fn validate_comment(content: &str) -> Result<String, ValidationError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::Missing("comment text"));
    }
    Ok(content.to_string())
}

/// Returns the normalized (trimmed, lowercased) email.
pub fn validate_credentials(email: &str, password: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(ValidationError::InvalidEmail),
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(email)
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MangaDraft {
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub status: MangaStatus,
}

impl MangaDraft {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::Missing("title"));
        }
        Ok(Self {
            title,
            original_title: non_blank(self.original_title),
            description: non_blank(self.description),
            cover_image: non_blank(self.cover_image),
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct VolumeDraft {
    pub number: i64,
    pub title: Option<String>,
    pub cover_image: Option<String>,
}

impl VolumeDraft {
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.number < 1 {
            return Err(ValidationError::NumberTooSmall {
                field: "volume number",
            });
        }
        Ok(Self {
            number: self.number,
            title: non_blank(self.title),
            cover_image: non_blank(self.cover_image),
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChapterDraft {
    pub number: f64,
    pub title: Option<String>,
    #[serde(default)]
    pub pages: Vec<String>,
}

impl ChapterDraft {
    pub fn validate(self) -> Result<Self, ValidationError> {
        if !self.number.is_finite() || self.number < 1.0 {
            return Err(ValidationError::NumberTooSmall {
                field: "chapter number",
            });
        }
        let pages = self
            .pages
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Ok(Self {
            number: self.number,
            title: non_blank(self.title),
            pages,
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CharacterDraft {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl CharacterDraft {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::Missing("name"));
        }
        Ok(Self {
            name,
            description: non_blank(self.description),
            image: non_blank(self.image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_without_text_is_rejected() {
        assert_eq!(
            validate_review("   ", 7),
            Err(ValidationError::Missing("review text"))
        );
    }

    #[test]
    fn review_without_rating_is_rejected() {
        assert_eq!(
            validate_review("Great arc", 0),
            Err(ValidationError::Missing("rating"))
        );
    }

    #[test]
    fn review_rating_is_bounded() {
        assert_eq!(
            validate_review("Great arc", 11),
            Err(ValidationError::RatingOutOfRange(11))
        );
        assert_eq!(
            validate_review(" Great arc ", 10),
            Ok(("Great arc".to_string(), 10))
        );
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(-3).is_err());
    }

    #[test]
    fn comment_is_trimmed() {
        assert_eq!(validate_comment("  nice  "), Ok("nice".to_string()));
        assert!(validate_comment("\n\t").is_err());
    }

    #[test]
    fn credentials_are_normalized() {
        assert_eq!(
            validate_credentials(" Reader@Example.com ", "hunter22"),
            Ok("reader@example.com".to_string())
        );
        assert_eq!(
            validate_credentials("no-at-sign", "hunter22"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_credentials("a@b", "123"),
            Err(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn chapter_draft_drops_blank_pages() {
        let draft = ChapterDraft {
            number: 3.5,
            title: Some("  ".into()),
            pages: vec!["a.png".into(), " ".into(), "b.png".into(), "".into()],
        }
        .validate()
        .unwrap();

        assert_eq!(draft.pages, vec!["a.png".to_string(), "b.png".to_string()]);
        assert_eq!(draft.title, None);
    }

    #[test]
    fn numbers_start_at_one() {
        let chapter = ChapterDraft {
            number: 0.5,
            title: None,
            pages: vec![],
        };
        assert!(chapter.validate().is_err());

        let volume = VolumeDraft {
            number: 0,
            title: None,
            cover_image: None,
        };
        assert!(volume.validate().is_err());
    }

    #[test]
    fn manga_draft_requires_title() {
        let draft = MangaDraft {
            title: " ".into(),
            ..Default::default()
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            ValidationError::Missing("title")
        );
    }
}
