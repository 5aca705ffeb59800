//! Remote table store adapters.
//!
//! Every backend is unified behind [`TableStore`]: `load` returns the raw
//! table together with the identity token a later write must present, and
//! `save` replaces the whole remote table. No backend offers a row-level
//! update primitive, so every save is a full-table overwrite.

pub mod cache;
pub mod github;
pub mod http;
pub mod sheets;

use crate::error::Result;
use crate::model::{RawTable, TrackerTable};

pub use cache::CachedStore;
pub use github::GithubStore;
pub use http::{UrlFormat, UrlStore};
pub use sheets::SheetsStore;

/// Opaque version/identity token required to write back.
///
/// Obtained on every load and consumed on every save. For the commit-based
/// backend a successful save invalidates earlier tokens, so a handle must
/// never be reused across saves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteHandle {
    /// Content hash of the commit-based backend.
    ContentSha(String),
    /// Worksheet range addressed by the live-sheet backend.
    Range(String),
    /// Source without a write path.
    ReadOnly,
}

/// Capability interface over the remote backends.
pub trait TableStore {
    /// Fetches the current table and the token required to write it back.
    fn load(&mut self) -> Result<(RawTable, RemoteHandle)>;

    /// Replaces the remote table with `table`, returning the token for the
    /// next write. A failed save must leave the remote content and the
    /// caller's in-memory table untouched.
    fn save(&mut self, table: &TrackerTable, handle: &RemoteHandle) -> Result<RemoteHandle>;
}

impl<S: TableStore + ?Sized> TableStore for Box<S> {
    fn load(&mut self) -> Result<(RawTable, RemoteHandle)> {
        (**self).load()
    }

    fn save(&mut self, table: &TrackerTable, handle: &RemoteHandle) -> Result<RemoteHandle> {
        (**self).save(table, handle)
    }
}
