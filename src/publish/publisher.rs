use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{ContentStore, Credentials, PublishError, RevisionToken};
use crate::articles::{to_pretty_json, Article};

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub revision: RevisionToken,
    pub articles: usize,
}

#[derive(Debug, Default)]
struct InFlight {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Serializes the collection and writes it to a [`ContentStore`].
///
/// At most one publish is live at a time: starting a new one cancels the
/// previous one if it has not finished.
pub struct Publisher {
    store: Arc<dyn ContentStore>,
    timeout: Duration,
    commit_message: String,
    in_flight: Mutex<InFlight>,
}

impl Publisher {
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, timeout: Duration, commit_message: impl Into<String>) -> Self {
        Self {
            store,
            timeout,
            commit_message: commit_message.into(),
            in_flight: Mutex::new(InFlight::default()),
        }
    }

    /// Write `articles` as the new remote document.
    ///
    /// When `expected` is given, the write only happens if the remote revision
    /// still matches it.
    ///
    /// # Errors
    ///
    /// Fails with [`PublishError::MissingCredentials`] before any network call
    /// if a credential is blank, [`PublishError::Conflict`] if the remote
    /// document moved, [`PublishError::Timeout`] or [`PublishError::Cancelled`]
    /// if the request did not complete, and with the underlying error otherwise.
    pub async fn publish(
        &self,
        credentials: &Credentials,
        articles: &[Article],
        expected: Option<&RevisionToken>,
    ) -> Result<PublishReceipt, PublishError> {
        if !credentials.is_complete() {
            warn!("Publish refused: missing credentials");
            return Err(PublishError::MissingCredentials);
        }

        let content = to_pretty_json(articles)?;
        let (generation, cancel) = self.begin();

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(PublishError::Cancelled),
            res = tokio::time::timeout(
                self.timeout,
                self.read_then_write(credentials, &content, expected),
            ) => res.map_err(|_| PublishError::Timeout).and_then(|r| r),
        };

        self.finish(generation);

        match &result {
            Ok(revision) => info!(
                count = articles.len(),
                revision = %revision,
                repository = %credentials.repository,
                "Published articles"
            ),
            Err(e) => warn!(repository = %credentials.repository, "Publish failed: {e:#}"),
        }

        result.map(|revision| PublishReceipt {
            revision,
            articles: articles.len(),
        })
    }

    async fn read_then_write(
        &self,
        credentials: &Credentials,
        content: &str,
        expected: Option<&RevisionToken>,
    ) -> Result<RevisionToken, PublishError> {
        let current = self.store.fetch_remote(credentials).await?;

        if let Some(expected) = expected {
            if *expected != current.revision {
                return Err(PublishError::Conflict {
                    expected: expected.to_string(),
                    found: current.revision.to_string(),
                });
            }
        }

        self.store
            .write(credentials, content, &current.revision, &self.commit_message)
            .await
    }

    /// Cancel the publish currently in flight, if any.
    pub fn cancel(&self) -> bool {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.token.take().is_some_and(|token| {
            token.cancel();
            true
        })
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .is_some()
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = in_flight.token.take() {
            info!("Cancelling superseded publish");
            previous.cancel();
        }
        in_flight.generation += 1;
        let token = CancellationToken::new();
        in_flight.token = Some(token.clone());
        (in_flight.generation, token)
    }

    fn finish(&self, generation: u64) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.generation == generation {
            in_flight.token = None;
        }
    }
}
