use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tracing::{info, warn};

/// Admin session lifetime in seconds.
pub const SESSION_TTL_SECS: i64 = 3600;

/// Generate a cryptographically secure random session token.
pub fn generate_session_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Argon2id PHC string for the configured admin password.
fn hash_admin_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash admin password: {e}"))
}

/// A malformed stored hash is an error; a wrong password is `Ok(false)`.
fn password_matches(candidate: &str, phc: &str) -> Result<bool> {
    let stored = PasswordHash::new(phc).map_err(|e| anyhow!("Invalid admin password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &stored)
        .is_ok())
}

/// Checks the admin password and tracks logged-in sessions in memory.
#[derive(Clone)]
pub struct AdminGate {
    password_hash: Arc<str>,
    sessions: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl AdminGate {
    /// Create a gate for `password`. Only its hash is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the password cannot be hashed.
    pub fn new(password: &str) -> Result<Self> {
        Ok(Self {
            password_hash: hash_admin_password(password)?.into(),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Verify `password` and open a session. Returns the session token.
    #[must_use]
    pub fn login(&self, password: &str) -> Option<String> {
        match password_matches(password, &self.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                warn!("Admin login rejected");
                return None;
            }
            Err(e) => {
                warn!("Admin password check failed: {e:#}");
                return None;
            }
        }

        let token = generate_session_token();
        let expires_at = Utc::now() + Duration::seconds(SESSION_TTL_SECS);

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, exp| *exp > Utc::now());
        sessions.insert(token.clone(), expires_at);
        info!(active_sessions = sessions.len(), "Admin logged in");

        Some(token)
    }

    /// Whether `token` names a live session.
    #[must_use]
    pub fn is_valid(&self, token: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .is_some_and(|exp| *exp > Utc::now())
    }

    pub fn logout(&self, token: &str) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}
