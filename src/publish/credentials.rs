use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Account, repository and access token used for authenticated writes.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "gh_u", default)]
    pub account: String,
    #[serde(rename = "gh_r", default)]
    pub repository: String,
    #[serde(rename = "gh_t", default)]
    pub token: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            repository: repository.into(),
            token: token.into(),
        }
    }

    /// All three values are non-blank. Nothing else is checked.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.account, &self.repository, &self.token]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("repository", &self.repository)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

/// Credentials persisted to a local JSON file between runs.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read saved credentials. A missing file reads as empty credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<Credentials> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved credentials");
                return Ok(Credentials::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read credentials: {}", self.path.display())
                })
            }
        };

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse credentials: {}", self.path.display()))
    }

    /// Persist credentials, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create credentials directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(credentials).context("Failed to serialize credentials")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write credentials: {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Saved credentials");
        Ok(())
    }
}
