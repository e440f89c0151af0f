//! Password gate in front of the admin pages.

pub mod middleware;
pub mod session;

pub use middleware::{session_token, RequireAdmin};
pub use session::{generate_session_token, AdminGate, SESSION_TTL_SECS};
