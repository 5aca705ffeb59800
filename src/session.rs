//! Operator credential check and session lifecycle.
//!
//! There is a single recognised operator role backed by a static credential
//! pair from the environment. A successful check produces a [`Session`]
//! that mutating interaction handlers take as an argument; the session ends
//! on explicit logout or when its expiry passes. No global logged-in flag.

use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config;
use crate::error::{Result, TrackerError};

/// How long a session stays valid without an explicit logout.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// The static credential table: one operator, password stored as a SHA-256
/// hex digest so the clear text never lives in configuration.
pub struct Credentials {
    username: String,
    password_sha256: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password_sha256: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_sha256: password_sha256.into().to_lowercase(),
        }
    }

    /// Reads the operator credential from `TRACKER_ADMIN_USER` and
    /// `TRACKER_ADMIN_PASSWORD_SHA256`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            config::require_env("TRACKER_ADMIN_USER")?,
            config::require_env("TRACKER_ADMIN_PASSWORD_SHA256")?,
        ))
    }

    /// Checks a username/password pair, returning a fresh session on match.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        if username != self.username || digest_hex(password) != self.password_sha256 {
            return Err(TrackerError::InvalidCredentials);
        }
        let session = Session {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Instant::now(),
            ttl: SESSION_TTL,
        };
        info!(session = %session.id, user = %session.username, "operator logged in");
        Ok(session)
    }
}

/// An authenticated interaction context.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    username: String,
    created_at: Instant,
    ttl: Duration,
}

impl Session {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }

    /// Ends the session. Dropping has the same effect; this exists so call
    /// sites can make the end of the session explicit.
    pub fn logout(self) {
        debug!(session = %self.id, "operator logged out");
    }
}

fn digest_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// SHA-256 hex digest of a password, for provisioning the credential table.
pub fn password_digest(password: &str) -> String {
    digest_hex(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("admin", password_digest("hunter2"))
    }

    #[test]
    fn correct_pair_creates_a_session() {
        let session = credentials().login("admin", "hunter2").unwrap();
        assert_eq!(session.username(), "admin");
        assert!(!session.is_expired());
    }

    #[test]
    fn wrong_password_is_rejected() {
        assert!(matches!(
            credentials().login("admin", "hunter3"),
            Err(TrackerError::InvalidCredentials)
        ));
    }

    #[test]
    fn unknown_user_is_rejected() {
        assert!(matches!(
            credentials().login("root", "hunter2"),
            Err(TrackerError::InvalidCredentials)
        ));
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let digest = password_digest("x");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
