//! Shared constants used across the application.

/// User agent sent with every outgoing request. GitHub rejects API calls
/// without one.
pub const USER_AGENT: &str = concat!("article-shelf/", env!("CARGO_PKG_VERSION"));

/// Color given to badges that do not specify one, including legacy tags.
pub const DEFAULT_BADGE_COLOR: &str = "#3b82f6";

/// Name of the admin session cookie.
pub const ADMIN_COOKIE: &str = "admin_session";
