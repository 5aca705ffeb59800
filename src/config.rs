//! Secret lookup from the hosting environment.
//!
//! Write access to the remote backends and the operator credential come in
//! through environment variables (a local `.env` is loaded by the binary).
//! Tokens are never read from the command line or from source.

use std::env;

use crate::error::{Result, TrackerError};

/// Bearer token for the commit-based backend.
pub const GITHUB_TOKEN: &str = "TRACKER_GITHUB_TOKEN";
/// OAuth bearer token for the live-sheet backend.
pub const SHEETS_TOKEN: &str = "TRACKER_SHEETS_TOKEN";

/// Reads a required environment variable, failing with
/// [`TrackerError::MissingSecret`] when it is absent or empty.
pub fn require_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(TrackerError::MissingSecret(name.to_string())),
    }
}

/// Reads an optional environment variable, treating empty as absent.
pub fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
