//! Load/save orchestration between the store layer and the typed table.

use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::model::TrackerTable;
use crate::normalize::normalize;
use crate::store::{RemoteHandle, TableStore};

/// Loads and normalizes the tracker table.
///
/// Duplicate composite keys are legal but suspicious, since edits keyed on
/// them touch every matching row; they are logged here so the operator sees
/// them once per load.
#[instrument(level = "info", skip_all)]
pub fn load_tracker(store: &mut dyn TableStore) -> Result<(TrackerTable, RemoteHandle)> {
    let (raw, handle) = store.load()?;
    let table = normalize(&raw)?;
    info!(row_count = table.len(), "loaded tracker table");

    for key in table.duplicate_keys() {
        warn!(%key, "composite key matches multiple rows");
    }

    Ok((table, handle))
}

/// Persists the full table, returning the handle for the next write.
///
/// On failure the caller's table is untouched and the previous handle stays
/// valid for an explicit retry.
#[instrument(level = "info", skip_all, fields(rows = table.len()))]
pub fn save_tracker(
    store: &mut dyn TableStore,
    table: &TrackerTable,
    handle: &RemoteHandle,
) -> Result<RemoteHandle> {
    let new_handle = store.save(table, handle)?;
    info!("saved tracker table");
    Ok(new_handle)
}
