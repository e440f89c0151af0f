//! GitHub repository contents API client.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ContentStore, Credentials, PublishError, RemoteDocument, RevisionToken};
use crate::config::Config;
use crate::constants::USER_AGENT;

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: PutContentsEntry,
}

#[derive(Debug, Deserialize)]
struct PutContentsEntry {
    sha: String,
}

/// A single file in a GitHub repository, read publicly and written through
/// the contents API.
#[derive(Debug, Clone)]
pub struct GitHubContents {
    http: Client,
    /// Public URL of the published document.
    raw_url: String,
    /// API base, e.g. `https://api.github.com`.
    api_url: String,
    /// Path of the document inside the repository.
    path: String,
}

impl GitHubContents {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, PublishError> {
        Self::with_endpoints(
            &config.articles_url,
            &config.github_api_url,
            &config.repo_file,
            config.request_timeout,
        )
    }

    /// Create a client against explicit endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_endpoints(
        raw_url: &str,
        api_url: &str,
        path: &str,
        timeout: Duration,
    ) -> Result<Self, PublishError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            raw_url: raw_url.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            path: path.trim_start_matches('/').to_string(),
        })
    }

    fn contents_url(&self, credentials: &Credentials) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            urlencoding::encode(credentials.account.trim()),
            urlencoding::encode(credentials.repository.trim()),
            self.path
        )
    }
}

/// Turn a non-success response into an error carrying its body.
async fn check_status(response: Response) -> Result<Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown".to_string());
    Err(PublishError::Status { status, body })
}

fn decode_content(encoded: &str) -> Result<String, PublishError> {
    // The API wraps base64 content at 60 columns.
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| PublishError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PublishError::Decode(e.to_string()))
}

#[async_trait]
impl ContentStore for GitHubContents {
    async fn fetch_raw(&self) -> Result<String, PublishError> {
        let cache_buster = chrono::Utc::now().timestamp_millis().to_string();
        debug!(url = %self.raw_url, "Fetching article document");

        let response = self
            .http
            .get(&self.raw_url)
            .query(&[("t", cache_buster.as_str())])
            .send()
            .await?;

        Ok(check_status(response).await?.text().await?)
    }

    async fn fetch_remote(&self, credentials: &Credentials) -> Result<RemoteDocument, PublishError> {
        let url = self.contents_url(credentials);
        debug!(url = %url, "Fetching revision token");

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("token {}", credentials.token.trim()))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let contents: ContentsResponse = check_status(response).await?.json().await?;

        Ok(RemoteDocument {
            revision: RevisionToken::new(contents.sha),
            content: decode_content(&contents.content)?,
        })
    }

    async fn write(
        &self,
        credentials: &Credentials,
        content: &str,
        revision: &RevisionToken,
        message: &str,
    ) -> Result<RevisionToken, PublishError> {
        let url = self.contents_url(credentials);
        let request = PutContentsRequest {
            message,
            content: STANDARD.encode(content.as_bytes()),
            sha: revision.as_str(),
        };

        debug!(url = %url, revision = %revision, bytes = content.len(), "Writing article document");

        let response = self
            .http
            .put(&url)
            .header("Authorization", format!("token {}", credentials.token.trim()))
            .header("Accept", "application/vnd.github+json")
            .json(&request)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(PublishError::Conflict {
                expected: revision.to_string(),
                found: "unknown".to_string(),
            });
        }

        let written: PutContentsResponse = check_status(response).await?.json().await?;
        info!(revision = %written.content.sha, "Article document written");

        Ok(RevisionToken::new(written.content.sha))
    }
}
