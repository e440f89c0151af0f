//! Publishing the article collection to a remote content store.
//!
//! The remote store is treated as an opaque blob addressed by a fixed path.
//! Writes are guarded by a revision token read just before the write.

mod credentials;
mod github;
mod publisher;

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::articles::ArticleError;

pub use credentials::{CredentialStore, Credentials};
pub use github::GitHubContents;
pub use publisher::{PublishReceipt, Publisher};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("account, repository and token are all required")]
    MissingCredentials,
    #[error("remote document changed since it was read (expected {expected}, found {found})")]
    Conflict { expected: String, found: String },
    #[error("remote request timed out")]
    Timeout,
    #[error("publish was cancelled")]
    Cancelled,
    #[error("remote store returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode remote content: {0}")]
    Decode(String),
    #[error(transparent)]
    Article(#[from] ArticleError),
}

impl PublishError {
    /// Text shown on the admin status line.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "GitHub account, repository and token are required.",
            Self::Conflict { .. } => {
                "The published file changed since it was loaded. Reload, re-apply your edits and publish again."
            }
            _ => "Publish failed. Check the token and repository.",
        }
    }
}

/// Opaque marker identifying one version of the remote document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionToken(String);

impl RevisionToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The remote document as seen through the authenticated API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub revision: RevisionToken,
    pub content: String,
}

/// A read-modify-write content store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the current document through the public, unauthenticated path.
    async fn fetch_raw(&self) -> Result<String, PublishError>;

    /// Fetch the document and its revision token through the authenticated API.
    async fn fetch_remote(&self, credentials: &Credentials) -> Result<RemoteDocument, PublishError>;

    /// Overwrite the document. `revision` must be the token of the version
    /// being replaced. Returns the token of the newly written version.
    async fn write(
        &self,
        credentials: &Credentials,
        content: &str,
        revision: &RevisionToken,
        message: &str,
    ) -> Result<RevisionToken, PublishError>;
}

/// State of the most recent publish attempt, as shown to the admin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PublishStatus {
    #[default]
    Idle,
    InProgress,
    Succeeded { revision: RevisionToken },
    Failed { message: String },
}

impl PublishStatus {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::InProgress => Some("Publishing..."),
            Self::Succeeded { .. } => Some("Published. The public site updates within about a minute."),
            Self::Failed { message } => Some(message),
        }
    }
}
