use serde::Serialize;

use crate::models::{ChapterMetadata, Volume};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChapterLink {
    pub id: String,
    pub number: f64,
    pub title: Option<String>,
}

impl From<&ChapterMetadata> for ChapterLink {
    fn from(chapter: &ChapterMetadata) -> Self {
        Self {
            id: chapter.id.clone(),
            number: chapter.number,
            title: chapter.title.clone(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct Navigation {
    pub previous: Option<ChapterLink>,
    pub next: Option<ChapterLink>,
}

/// Previous/next chapter for `current_id` within a title's chapters.
///
/// `chapters` must already be ordered by number. Returns `None` when the
/// chapter is not part of the list.
pub fn navigation(chapters: &[ChapterMetadata], current_id: &str) -> Option<Navigation> {
    let index = chapters.iter().position(|c| c.id == current_id)?;

    let previous = index
        .checked_sub(1)
        .and_then(|i| chapters.get(i))
        .map(ChapterLink::from);
    let next = chapters.get(index + 1).map(ChapterLink::from);

    Some(Navigation { previous, next })
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ContentsEntry {
    pub id: String,
    pub number: f64,
    pub title: Option<String>,
    pub is_current: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct VolumeContents {
    pub volume: Volume,
    pub chapters: Vec<ContentsEntry>,
}

/// Group chapters under their volumes, keeping both input orders.
pub fn table_of_contents(
    volumes: &[Volume],
    chapters: &[ChapterMetadata],
    current: Option<&str>,
) -> Vec<VolumeContents> {
    volumes
        .iter()
        .map(|volume| VolumeContents {
            volume: volume.clone(),
            chapters: chapters
                .iter()
                .filter(|c| c.volume_id == volume.id)
                .map(|c| ContentsEntry {
                    id: c.id.clone(),
                    number: c.number,
                    title: c.title.clone(),
                    is_current: current == Some(c.id.as_str()),
                })
                .collect(),
        })
        .collect()
}

/// Mean rating rounded to one decimal.
pub fn average_rating(ratings: impl IntoIterator<Item = i64>) -> Option<f64> {
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), r| (sum + r, count + 1));
    if count == 0 {
        return None;
    }
    let mean = sum as f64 / count as f64;
    Some((mean * 10.0).round() / 10.0)
}
