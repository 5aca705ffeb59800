//! Core library for the tracker-sync command line application.
//!
//! The library implements the status-sync round trip for a mentor/resource/
//! week tracker table: load from a remote store, normalize, apply edits,
//! persist the full table back. The modules keep responsibilities narrow and
//! composable: remote backends live under [`store`], payload codecs under
//! [`io`], the typed table in [`model`], normalization in [`normalize`],
//! editing in [`edit`], aggregation in [`report`], and the load/save
//! orchestration in [`sync`].

pub mod config;
pub mod edit;
pub mod error;
pub mod io;
pub mod model;
pub mod normalize;
pub mod report;
pub mod session;
pub mod store;
pub mod sync;

pub use error::{Result, TrackerError};
pub use model::{RawTable, RowKey, Status, TrackerRow, TrackerTable};
pub use store::{RemoteHandle, TableStore};
