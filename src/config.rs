use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    // Published document
    pub articles_url: String,
    pub refresh_interval: Duration,

    // Remote repository
    pub github_api_url: String,
    pub repo_file: String,
    pub commit_message: String,
    pub request_timeout: Duration,
    pub credentials_path: PathBuf,

    // Admin
    pub admin_password: String,

    // Web Server
    pub site_title: String,
    pub web_host: String,
    pub web_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("articles_url", &self.articles_url)
            .field("refresh_interval", &self.refresh_interval)
            .field("github_api_url", &self.github_api_url)
            .field("repo_file", &self.repo_file)
            .field("commit_message", &self.commit_message)
            .field("request_timeout", &self.request_timeout)
            .field("credentials_path", &self.credentials_path)
            .field("admin_password", &"<redacted>")
            .field("site_title", &self.site_title)
            .field("web_host", &self.web_host)
            .field("web_port", &self.web_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Published document
            articles_url: required_env("ARTICLES_URL")?,
            refresh_interval: Duration::from_secs(parse_env_u64("REFRESH_INTERVAL_SECS", 300)?),

            // Remote repository
            github_api_url: env_or_default("GITHUB_API_URL", "https://api.github.com"),
            repo_file: env_or_default("REPO_FILE", "data.json"),
            commit_message: env_or_default("COMMIT_MESSAGE", "Update articles via admin"),
            request_timeout: Duration::from_secs(parse_env_u64("REQUEST_TIMEOUT_SECS", 30)?),
            credentials_path: PathBuf::from(env_or_default(
                "CREDENTIALS_PATH",
                "./data/credentials.json",
            )),

            // Admin
            admin_password: required_env("ADMIN_PASSWORD")?,

            // Web Server
            site_title: env_or_default("SITE_TITLE", "Articles"),
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.articles_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "ARTICLES_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.admin_password.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "ADMIN_PASSWORD".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.repo_file.trim_matches('/').is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "REPO_FILE".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REFRESH_INTERVAL_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration with defaults suitable for tests.
    #[doc(hidden)]
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            articles_url: "http://127.0.0.1:9/data.json".to_string(),
            refresh_interval: Duration::from_secs(300),
            github_api_url: "http://127.0.0.1:9".to_string(),
            repo_file: "data.json".to_string(),
            commit_message: "Update articles via admin".to_string(),
            request_timeout: Duration::from_secs(5),
            credentials_path: PathBuf::from("./data/credentials.json"),
            admin_password: "test-password".to_string(),
            site_title: "Articles".to_string(),
            web_host: "127.0.0.1".to_string(),
            web_port: 8080,
        }
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
