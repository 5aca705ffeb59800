//! Short-lived read cache in front of any store.
//!
//! A load within the TTL serves the previously fetched table; any successful
//! save drops the cached entry wholesale so the next read reflects the
//! change. There is no per-row invalidation because there are no per-row
//! writes.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;
use crate::model::{RawTable, TrackerTable};
use crate::store::{RemoteHandle, TableStore};

/// Default cache lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

pub struct CachedStore<S> {
    inner: S,
    ttl: Duration,
    cached: Option<Entry>,
}

struct Entry {
    fetched_at: Instant,
    table: RawTable,
    handle: RemoteHandle,
}

impl<S> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: None,
        }
    }

    /// Drops any cached load result.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

impl<S: TableStore> TableStore for CachedStore<S> {
    fn load(&mut self) -> Result<(RawTable, RemoteHandle)> {
        if let Some(entry) = &self.cached
            && entry.fetched_at.elapsed() < self.ttl
        {
            debug!("serving cached table");
            return Ok((entry.table.clone(), entry.handle.clone()));
        }

        let (table, handle) = self.inner.load()?;
        self.cached = Some(Entry {
            fetched_at: Instant::now(),
            table: table.clone(),
            handle: handle.clone(),
        });
        Ok((table, handle))
    }

    fn save(&mut self, table: &TrackerTable, handle: &RemoteHandle) -> Result<RemoteHandle> {
        let new_handle = self.inner.save(table, handle)?;
        self.invalidate();
        Ok(new_handle)
    }
}
