//! Commit-based backend over the GitHub Contents API.
//!
//! The tracker lives as an xlsx file in a repository. Reads fetch the file
//! content (base64 in a JSON envelope) together with its blob sha; writes
//! submit the whole file again with the sha of the version they replace.
//! The remote service rejects stale shas, so a save is a read-modify-write:
//! the current sha is re-fetched immediately before the PUT.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::io::excel;
use crate::model::{RawTable, TrackerTable};
use crate::store::{RemoteHandle, TableStore};

const COMMIT_MESSAGE: &str = "Update tracker table";

pub struct GithubStore {
    client: Client,
    contents_url: String,
    branch: String,
    token: String,
}

impl GithubStore {
    pub fn new(
        owner: &str,
        repo: &str,
        file_path: &str,
        branch: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            contents_url: format!("https://api.github.com/repos/{owner}/{repo}/contents/{file_path}"),
            branch: branch.into(),
            token: token.into(),
        }
    }

    fn fetch_content(&self) -> Result<(Vec<u8>, String)> {
        let response = self
            .client
            .get(&self.contents_url)
            .query(&[("ref", self.branch.as_str())])
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "tracker-sync")
            .send()
            .map_err(|e| TrackerError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::SourceUnavailable(format!(
                "contents fetch returned {status}"
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| TrackerError::Parse(e.to_string()))?;
        let sha = body["sha"]
            .as_str()
            .ok_or_else(|| TrackerError::Parse("contents response missing 'sha'".into()))?
            .to_string();
        let encoded: String = body["content"]
            .as_str()
            .ok_or_else(|| TrackerError::Parse("contents response missing 'content'".into()))?
            .split_whitespace()
            .collect();
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| TrackerError::Parse(format!("invalid base64 content: {e}")))?;

        debug!(sha = %sha, size = bytes.len(), "fetched file content");
        Ok((bytes, sha))
    }
}

impl TableStore for GithubStore {
    fn load(&mut self) -> Result<(RawTable, RemoteHandle)> {
        let (bytes, sha) = self.fetch_content()?;
        let raw = excel::read_table(&bytes)?;
        Ok((raw, RemoteHandle::ContentSha(sha)))
    }

    fn save(&mut self, table: &TrackerTable, handle: &RemoteHandle) -> Result<RemoteHandle> {
        // Stale tokens are rejected remotely, so take the current sha right
        // before writing rather than trusting the one from the last load.
        let (_, current_sha) = self.fetch_content()?;
        if let RemoteHandle::ContentSha(loaded) = handle
            && *loaded != current_sha
        {
            debug!(loaded = %loaded, current = %current_sha, "content changed since load");
        }

        let bytes = excel::write_table(&table.to_raw())?;
        let payload = json!({
            "message": COMMIT_MESSAGE,
            "content": STANDARD.encode(&bytes),
            "branch": self.branch,
            "sha": current_sha,
        });

        let response = self
            .client
            .put(&self.contents_url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "tracker-sync")
            .json(&payload)
            .send()
            .map_err(|e| TrackerError::WriteRejected(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TrackerError::WriteRejected(format!(
                "contents update returned {status}: {body}"
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| TrackerError::Parse(e.to_string()))?;
        let new_sha = body["content"]["sha"]
            .as_str()
            .ok_or_else(|| TrackerError::Parse("update response missing content sha".into()))?
            .to_string();

        info!(sha = %new_sha, rows = table.len(), "committed tracker table");
        Ok(RemoteHandle::ContentSha(new_sha))
    }
}
