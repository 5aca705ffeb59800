//! Read-only backends behind a static URL: an xlsx file served anonymously,
//! or a published-sheet CSV export endpoint.
//!
//! These sources have no write API. Earlier incarnations of the dashboard
//! reported success without persisting anything; here a save fails loudly
//! instead so the operator knows the edit went nowhere.

use reqwest::blocking::Client;

use crate::error::{Result, TrackerError};
use crate::io::{csv, excel};
use crate::model::{RawTable, TrackerTable};
use crate::store::{RemoteHandle, TableStore};

/// Payload format served by the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlFormat {
    Xlsx,
    Csv,
}

pub struct UrlStore {
    client: Client,
    url: String,
    format: UrlFormat,
}

impl UrlStore {
    pub fn new(url: impl Into<String>, format: UrlFormat) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            format,
        }
    }
}

impl TableStore for UrlStore {
    fn load(&mut self) -> Result<(RawTable, RemoteHandle)> {
        let response = self
            .client
            .get(&self.url)
            .header("User-Agent", "tracker-sync")
            .send()
            .map_err(|e| TrackerError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::SourceUnavailable(format!(
                "fetch of {} returned {status}",
                self.url
            )));
        }

        let raw = match self.format {
            UrlFormat::Xlsx => {
                let bytes = response
                    .bytes()
                    .map_err(|e| TrackerError::SourceUnavailable(e.to_string()))?;
                excel::read_table(&bytes)?
            }
            UrlFormat::Csv => {
                let text = response
                    .text()
                    .map_err(|e| TrackerError::SourceUnavailable(e.to_string()))?;
                csv::read_table(&text)?
            }
        };

        Ok((raw, RemoteHandle::ReadOnly))
    }

    fn save(&mut self, _table: &TrackerTable, _handle: &RemoteHandle) -> Result<RemoteHandle> {
        Err(TrackerError::WriteRejected(format!(
            "{} is a read-only source",
            self.url
        )))
    }
}
