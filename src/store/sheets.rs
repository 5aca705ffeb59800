//! Live-sheet backend over the Google Sheets values API.
//!
//! Reads pull every row of the configured range; writes clear the range and
//! rewrite header plus data rows. Clear-then-write is not atomic: a crash
//! between the two calls leaves the sheet empty or partially written. That
//! is an accepted limitation of the underlying API.

use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::info;

use crate::error::{Result, TrackerError};
use crate::model::{RawTable, TrackerTable};
use crate::store::{RemoteHandle, TableStore};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct SheetsStore {
    client: Client,
    spreadsheet_id: String,
    range: String,
    token: String,
}

impl SheetsStore {
    /// `token` is an OAuth bearer token with spreadsheet scope, supplied by
    /// the hosting environment. Service-account keys never pass through this
    /// crate.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
            token: token.into(),
        }
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{API_BASE}/{}/values/{}{suffix}",
            self.spreadsheet_id, self.range
        )
    }
}

impl TableStore for SheetsStore {
    fn load(&mut self) -> Result<(RawTable, RemoteHandle)> {
        let response = self
            .client
            .get(self.values_url(""))
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| TrackerError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::SourceUnavailable(format!(
                "values fetch returned {status}"
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| TrackerError::Parse(e.to_string()))?;
        let mut records = match body["values"].as_array() {
            Some(values) => values
                .iter()
                .map(|record| {
                    record
                        .as_array()
                        .map(|cells| {
                            cells
                                .iter()
                                .map(|cell| cell.as_str().unwrap_or_default().to_string())
                                .collect::<Vec<_>>()
                        })
                        .ok_or_else(|| TrackerError::Parse("malformed values row".into()))
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        if records.is_empty() {
            return Err(TrackerError::Parse("sheet range is empty".into()));
        }
        let columns = records.remove(0);
        let rows = records
            .into_iter()
            .map(|mut cells| {
                cells.resize(columns.len(), String::new());
                cells
            })
            .collect();

        Ok((
            RawTable { columns, rows },
            RemoteHandle::Range(self.range.clone()),
        ))
    }

    fn save(&mut self, table: &TrackerTable, _handle: &RemoteHandle) -> Result<RemoteHandle> {
        let clear = self
            .client
            .post(self.values_url(":clear"))
            .bearer_auth(&self.token)
            .json(&json!({}))
            .send()
            .map_err(|e| TrackerError::WriteRejected(e.to_string()))?;
        if !clear.status().is_success() {
            return Err(TrackerError::WriteRejected(format!(
                "values clear returned {}",
                clear.status()
            )));
        }

        let raw = table.to_raw();
        let mut values: Vec<Vec<String>> = Vec::with_capacity(raw.rows.len() + 1);
        values.push(raw.columns.clone());
        values.extend(raw.rows.iter().cloned());

        let update = self
            .client
            .put(self.values_url("?valueInputOption=RAW"))
            .bearer_auth(&self.token)
            .json(&json!({
                "range": self.range,
                "majorDimension": "ROWS",
                "values": values,
            }))
            .send()
            .map_err(|e| TrackerError::WriteRejected(e.to_string()))?;
        if !update.status().is_success() {
            return Err(TrackerError::WriteRejected(format!(
                "values update returned {}",
                update.status()
            )));
        }

        info!(rows = table.len(), range = %self.range, "rewrote sheet range");
        Ok(RemoteHandle::Range(self.range.clone()))
    }
}
