//! Session error taxonomy.

use thiserror::Error;

use crate::compose::ComposeError;

/// Why a session operation did not complete.
///
/// The `Display` strings double as the status line shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The user dismissed the file dialog. Not a failure; nothing changed.
    #[error("Cancelled")]
    UserCancelled,

    /// The host could not read or decode the chosen file. The session
    /// keeps whatever it had loaded before.
    #[error("Error: {0}")]
    Acquisition(String),

    /// The enhanced variant could not be produced. The view has reverted
    /// to the original image.
    #[error("Enhance error: {0}")]
    Enhancement(String),

    /// The export attempt failed. The session remains editable.
    #[error("Save error: {0}")]
    Export(String),

    /// An operation that needs an image was invoked with none loaded.
    #[error("No image loaded")]
    InvalidState,

    /// A request of the same kind is already in flight.
    #[error("{0} already in progress")]
    Busy(&'static str),
}

impl From<ComposeError> for SessionError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::NoImage => SessionError::InvalidState,
            other => SessionError::Export(other.to_string()),
        }
    }
}

/// The export was saved but the secondary upload/indexing step failed.
///
/// Carried inside a successful export report; never returned as an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("upload failed: {0}")]
pub struct UploadWarning(pub String);
