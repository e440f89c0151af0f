//! In-memory article collection.

use tracing::{debug, info, warn};

use super::query::{self, SortMode};
use super::{parse_collection, Article};
use crate::publish::ContentStore;

/// The canonical article collection for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleStore {
    articles: Vec<Article>,
}

impl ArticleStore {
    #[must_use]
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    /// Replace the collection with the document held by `source`.
    ///
    /// Any fetch or parse failure leaves the collection empty; the failure is
    /// logged and not returned. Returns the number of loaded articles.
    pub async fn load<S>(&mut self, source: &S) -> usize
    where
        S: ContentStore + ?Sized,
    {
        let loaded = match source.fetch_raw().await {
            Ok(raw) => match parse_collection(&raw) {
                Ok(articles) => articles,
                Err(e) => {
                    warn!("Failed to parse article document: {e:#}");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("Failed to fetch article document: {e:#}");
                Vec::new()
            }
        };

        info!(count = loaded.len(), "Loaded articles");
        self.articles = loaded;
        self.articles.len()
    }

    pub fn replace(&mut self, articles: Vec<Article>) {
        self.articles = articles;
    }

    /// Insert or replace by id.
    ///
    /// An existing record keeps its position; a new one goes to the front.
    pub fn upsert(&mut self, article: Article) {
        if let Some(slot) = self.articles.iter_mut().find(|a| a.id == article.id) {
            debug!(id = article.id, "Replacing article");
            *slot = article;
        } else {
            debug!(id = article.id, "Inserting article");
            self.articles.insert(0, article);
        }
    }

    #[must_use]
    pub fn find_by_id(&self, id: i64) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// Reorder the canonical collection.
    pub fn sort(&mut self, mode: SortMode) {
        query::sort(&mut self.articles, mode);
    }

    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
