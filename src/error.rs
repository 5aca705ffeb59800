use thiserror::Error;

use crate::model::RowKey;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Error type covering the different failure cases that can occur when the
/// tool loads, edits, or persists the tracker table.
///
/// Every variant is recoverable at the interaction boundary: the binary
/// surfaces the message and exits without touching the remote store again.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Wrapper for IO failures such as reading or writing local files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a remote read fails, either on the network or with a
    /// non-success status.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// Raised when the remote store refuses a write, e.g. a stale identity
    /// token or a permission denial.
    #[error("write rejected: {0}")]
    WriteRejected(String),

    /// Raised when a payload cannot be decoded into tabular rows.
    #[error("parse error: {0}")]
    Parse(String),

    /// Raised when an edit supplies a status value outside the two
    /// recognised ones.
    #[error("invalid status value '{0}'")]
    InvalidStatus(String),

    /// Raised when an edit targets a composite key with zero matching rows.
    #[error("no row matches {0}")]
    KeyNotFound(RowKey),

    /// Raised when the operator credential check fails.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Raised when a required secret is absent from the environment.
    #[error("missing secret: set the {0} environment variable")]
    MissingSecret(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
