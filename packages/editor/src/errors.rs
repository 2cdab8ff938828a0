//! Error types for the editor

use formsync_codec::{Format, SerializeError};
use thiserror::Error;

/// Internal failure to turn the value tree into text
///
/// Not expected in practice; surfaced to the user as a banner and the
/// operation that hit it leaves state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Failed to write the document as {format}: {message}")]
    Serialize { format: Format, message: String },
}

impl SyncError {
    pub fn serialize(format: Format, err: SerializeError) -> Self {
        SyncError::Serialize {
            format,
            message: err.to_string(),
        }
    }
}

/// Failures of an [`EditSession`](crate::EditSession) operation
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Session has been disposed")]
    Disposed,
}
