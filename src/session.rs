//! Per-session view state for the public listing and the admin editor.
//!
//! Each session owns its own article collection and UI state, so several can
//! coexist in one process.

use thiserror::Error;
use tracing::debug;

use crate::articles::{
    filter, tag_chips, Article, ArticleStore, BadgeEditor, DraftFields, EditDraft, SortMode,
    TagChip, TagFilter,
};
use crate::publish::{PublishStatus, RevisionToken};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no article with id {0}")]
    NotFound(i64),
}

/// What one visitor of the public listing sees.
#[derive(Debug, Clone, Default)]
pub struct PublicView {
    store: ArticleStore,
    filter: TagFilter,
    sort_mode: Option<SortMode>,
}

impl PublicView {
    #[must_use]
    pub fn new(store: ArticleStore) -> Self {
        Self {
            store,
            filter: TagFilter::default(),
            sort_mode: None,
        }
    }

    /// Click on a tag chip.
    pub fn toggle_filter(&mut self, tag: &str) {
        self.filter.toggle(tag);
    }

    #[must_use]
    pub fn current_filter(&self) -> Option<&str> {
        self.filter.current()
    }

    /// Reorder the underlying collection. The order persists across filters.
    pub fn set_sort(&mut self, mode: SortMode) {
        self.sort_mode = Some(mode);
        self.store.sort(mode);
    }

    #[must_use]
    pub fn sort_mode(&self) -> Option<SortMode> {
        self.sort_mode
    }

    /// Articles to display under the current filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&Article> {
        filter(self.store.articles(), self.filter.current())
    }

    /// Filter chips for every badge label in the unfiltered collection.
    #[must_use]
    pub fn chips(&self) -> Vec<TagChip> {
        tag_chips(self.store.articles(), self.filter.current())
    }

    /// The filter value a click on `tag` would select.
    #[must_use]
    pub fn filter_after_click(&self, tag: &str) -> Option<String> {
        self.filter.toggled(tag)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.store.len()
    }
}

/// The admin editor: collection, draft, badge scratch list and publish state.
#[derive(Debug, Clone, Default)]
pub struct AdminSession {
    store: ArticleStore,
    draft: EditDraft,
    badges: BadgeEditor,
    base_revision: Option<RevisionToken>,
    status: PublishStatus,
    /// Set by edits to the collection, cleared when it is replaced wholesale.
    modified: bool,
}

impl AdminSession {
    #[must_use]
    pub fn new(store: ArticleStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn articles(&self) -> &[Article] {
        self.store.articles()
    }

    #[must_use]
    pub fn draft(&self) -> &EditDraft {
        &self.draft
    }

    #[must_use]
    pub fn badges(&self) -> &BadgeEditor {
        &self.badges
    }

    /// Discard the draft and start a new, empty one.
    pub fn begin_new(&mut self) {
        self.draft = EditDraft::default();
        self.badges.reset();
    }

    /// Load a copy of a stored article into the draft.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if no article has this id.
    pub fn begin_edit(&mut self, id: i64) -> Result<(), SessionError> {
        let article = self.store.find_by_id(id).ok_or(SessionError::NotFound(id))?;
        self.draft = EditDraft::from_article(article);
        self.badges.seed(&article.badges);
        debug!(id, "Editing article");
        Ok(())
    }

    pub fn update_draft(&mut self, fields: DraftFields) {
        self.draft.fields = fields;
    }

    pub fn add_badge(&mut self, text: &str, color: &str) -> bool {
        self.badges.add(text, color)
    }

    pub fn remove_badge(&mut self, index: usize) -> bool {
        self.badges.remove_at(index).is_some()
    }

    /// Commit the draft into the collection and reset the editor.
    ///
    /// Returns the id of the saved article.
    pub fn save_draft(&mut self) -> i64 {
        let id = match self.draft.editing_id {
            Some(id) => id,
            None => Article::new_id(self.store.articles()),
        };
        let article = self.draft.to_article(id, self.badges.badges());
        self.store.upsert(article);
        self.modified = true;
        self.begin_new();
        debug!(id, "Saved draft");
        id
    }

    /// Drop the draft without saving.
    pub fn cancel(&mut self) {
        self.begin_new();
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.store.sort(mode);
        self.modified = true;
    }

    /// Whether the collection holds edits that were never replaced by a load.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Replace the collection, e.g. after reloading from the remote store.
    pub fn replace_articles(&mut self, articles: Vec<Article>, revision: Option<RevisionToken>) {
        self.store.replace(articles);
        self.base_revision = revision;
        self.modified = false;
    }

    /// Collection and base revision to publish.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<Article>, Option<RevisionToken>) {
        (self.store.articles().to_vec(), self.base_revision.clone())
    }

    #[must_use]
    pub fn base_revision(&self) -> Option<&RevisionToken> {
        self.base_revision.as_ref()
    }

    pub fn set_base_revision(&mut self, revision: Option<RevisionToken>) {
        self.base_revision = revision;
    }

    #[must_use]
    pub fn status(&self) -> &PublishStatus {
        &self.status
    }

    pub fn set_status(&mut self, status: PublishStatus) {
        self.status = status;
    }
}
