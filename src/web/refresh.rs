//! Loading and periodic refresh of the article snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::articles::{parse_collection, Article, ArticleStore};
use crate::publish::{ContentStore, Credentials, RevisionToken};

/// Coordinates the refresh loop with publishes.
///
/// The public URL lags behind a fresh write, so the tick right after a
/// publish would put the previous document back.
#[derive(Debug, Default)]
pub struct RefreshControl {
    skip_next: AtomicBool,
}

impl RefreshControl {
    /// Leave the snapshot alone on the next tick.
    pub fn skip_next(&self) {
        self.skip_next.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_skipping(&self) -> bool {
        self.skip_next.load(Ordering::SeqCst)
    }

    fn take_skip(&self) -> bool {
        self.skip_next.swap(false, Ordering::SeqCst)
    }
}

/// Load the collection the editor works on.
///
/// With complete credentials the authenticated API is used so the returned
/// revision can guard the next publish. Otherwise, or if that fails, the
/// public document is loaded without a revision.
pub async fn fetch_editor_collection(
    source: &dyn ContentStore,
    credentials: &Credentials,
) -> (Vec<Article>, Option<RevisionToken>) {
    if credentials.is_complete() {
        match source.fetch_remote(credentials).await {
            Ok(doc) => match parse_collection(&doc.content) {
                Ok(articles) => {
                    info!(count = articles.len(), revision = %doc.revision, "Loaded editor articles");
                    return (articles, Some(doc.revision));
                }
                Err(e) => warn!("Failed to parse remote document: {e:#}"),
            },
            Err(e) => warn!("Authenticated load failed, using public file: {e:#}"),
        }
    }

    let mut store = ArticleStore::default();
    store.load(source).await;
    (store.articles().to_vec(), None)
}

/// Fetch the published document and swap it into `target`.
///
/// Unlike [`ArticleStore::load`], a failure keeps the current snapshot.
///
/// # Errors
///
/// Returns an error if the document cannot be fetched or parsed.
pub async fn refresh_once(source: &dyn ContentStore, target: &RwLock<ArticleStore>) -> Result<usize> {
    let raw = source
        .fetch_raw()
        .await
        .context("Failed to fetch article document")?;
    let articles = parse_collection(&raw).context("Failed to parse article document")?;
    let count = articles.len();

    target.write().await.replace(articles);
    Ok(count)
}

/// One tick of the refresh loop. Returns `None` when the tick was skipped.
///
/// # Errors
///
/// Returns an error if the document cannot be fetched or parsed.
pub async fn refresh_tick(
    source: &dyn ContentStore,
    target: &RwLock<ArticleStore>,
    control: &RefreshControl,
) -> Result<Option<usize>> {
    if control.take_skip() {
        return Ok(None);
    }
    refresh_once(source, target).await.map(Some)
}

/// Refresh the public snapshot every `interval` until `shutdown` fires.
pub async fn refresh_loop(
    source: Arc<dyn ContentStore>,
    target: Arc<RwLock<ArticleStore>>,
    control: Arc<RefreshControl>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    info!(interval_secs = interval.as_secs(), "Starting refresh loop");

    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // Skip the immediate tick; startup already loaded

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match refresh_tick(source.as_ref(), &target, &control).await {
                    Ok(Some(count)) => debug!(count, "Refreshed public articles"),
                    Ok(None) => debug!("Skipped refresh after publish"),
                    Err(e) => warn!("Refresh failed, keeping previous articles: {e:#}"),
                }
            }
            () = shutdown.cancelled() => {
                info!("Refresh loop shutting down");
                break;
            }
        }
    }
}
