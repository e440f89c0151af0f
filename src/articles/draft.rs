//! The article under edit in the admin view.

use super::{Article, Badge};
use crate::constants::DEFAULT_BADGE_COLOR;

/// Scratch list of badges for the article under edit.
///
/// Entries are addressed by position. The list is always a copy, never a view
/// into a stored article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeEditor {
    badges: Vec<Badge>,
}

impl BadgeEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a badge. Blank labels are ignored; a blank color falls back to
    /// the default badge color.
    ///
    /// Returns whether a badge was added.
    pub fn add(&mut self, text: &str, color: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let color = match color.trim() {
            "" => DEFAULT_BADGE_COLOR,
            c => c,
        };
        self.badges.push(Badge::new(text, color));
        true
    }

    /// Remove the entry at `index`, shifting later entries down.
    pub fn remove_at(&mut self, index: usize) -> Option<Badge> {
        if index < self.badges.len() {
            Some(self.badges.remove(index))
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.badges.clear();
    }

    /// Replace the list with a copy of `badges`.
    pub fn seed(&mut self, badges: &[Badge]) {
        self.badges = badges.to_vec();
    }

    #[must_use]
    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.badges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

/// Text fields of the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftFields {
    pub title: String,
    pub date: String,
    pub summary: String,
    pub content: String,
}

/// An article record under construction.
///
/// `editing_id` is `None` for a new article, or the id of the stored article
/// being edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDraft {
    pub editing_id: Option<i64>,
    pub fields: DraftFields,
}

impl EditDraft {
    /// Start editing a copy of `article`.
    #[must_use]
    pub fn from_article(article: &Article) -> Self {
        Self {
            editing_id: Some(article.id),
            fields: DraftFields {
                title: article.title.clone(),
                date: article.date.clone(),
                summary: article.summary.clone(),
                content: article.content.clone(),
            },
        }
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.editing_id.is_none()
    }

    /// Build the article this draft commits as.
    #[must_use]
    pub fn to_article(&self, id: i64, badges: &[Badge]) -> Article {
        Article {
            id,
            title: self.fields.title.clone(),
            date: self.fields.date.clone(),
            badges: badges.to_vec(),
            summary: self.fields.summary.clone(),
            content: self.fields.content.clone(),
        }
    }
}
