//! Article data model and the persisted document format.
//!
//! The repository file is a JSON array of articles. Two generations of the
//! format exist: the current one carries `badges` (`{text, color}` objects),
//! an older one carries a flat `tags` array of strings. Both are accepted on
//! read and normalized into [`Article`]; only the current format is written.

pub mod draft;
pub mod query;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_BADGE_COLOR;

pub use draft::{BadgeEditor, DraftFields, EditDraft};
pub use query::{filter, sort, tag_chips, SortMode, TagChip, TagFilter};
pub use store::ArticleStore;

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("failed to parse article document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize article document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// A labeled, colored tag attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub text: String,
    pub color: String,
}

impl Badge {
    #[must_use]
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: color.into(),
        }
    }
}

/// One content record.
///
/// Field order is the serialized key order of the repository file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub badges: Vec<Badge>,
    pub summary: String,
    pub content: String,
}

impl Article {
    /// Returns true if any badge carries exactly this label.
    #[must_use]
    pub fn has_badge(&self, text: &str) -> bool {
        self.badges.iter().any(|b| b.text == text)
    }

    /// Allocate an id for a new article.
    ///
    /// Ids are millisecond timestamps. When the current instant collides with
    /// an id already in `existing`, it is bumped until unique.
    #[must_use]
    pub fn new_id(existing: &[Article]) -> i64 {
        let mut id = chrono::Utc::now().timestamp_millis();
        while existing.iter().any(|a| a.id == id) {
            id += 1;
        }
        id
    }
}

/// On-disk record shape covering both format generations.
#[derive(Debug, Deserialize)]
struct StoredArticle {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    badges: Option<Vec<Badge>>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    content: String,
}

impl From<StoredArticle> for Article {
    fn from(stored: StoredArticle) -> Self {
        let badges = match (stored.badges, stored.tags) {
            (Some(badges), _) => badges,
            (None, Some(tags)) => tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(|t| Badge::new(t, DEFAULT_BADGE_COLOR))
                .collect(),
            (None, None) => Vec::new(),
        };

        Self {
            id: stored.id,
            title: stored.title,
            date: stored.date,
            badges,
            summary: stored.summary,
            content: stored.content,
        }
    }
}

/// Parse a repository document into articles, migrating legacy records.
///
/// # Errors
///
/// Returns an error if the document is not a JSON array of article records.
pub fn parse_collection(json: &str) -> Result<Vec<Article>, ArticleError> {
    let stored: Vec<StoredArticle> = serde_json::from_str(json).map_err(ArticleError::Parse)?;
    Ok(stored.into_iter().map(Article::from).collect())
}

/// Serialize articles into the repository document format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_pretty_json(articles: &[Article]) -> Result<String, ArticleError> {
    serde_json::to_string_pretty(articles).map_err(ArticleError::Serialize)
}
