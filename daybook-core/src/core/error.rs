//! Error types for the Daybook core library.

use thiserror::Error;

/// All errors that can occur within the Daybook core library.
#[derive(Debug, Error)]
pub enum DaybookError {
    /// The store file could not be opened or its schema could not be initialised.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] rusqlite::Error),

    /// An insert, update or delete statement failed.
    #[error("Write failed: {0}")]
    Write(#[source] rusqlite::Error),

    /// A select statement failed.
    #[error("Read failed: {0}")]
    Read(#[source] rusqlite::Error),

    /// Stored note content could not be parsed as JSON, or input content
    /// could not be serialised.
    #[error("Content serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A note ID was targeted that does not exist in the store.
    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// An event ID was targeted that does not exist in the store.
    #[error("Event not found: {0}")]
    EventNotFound(i64),
}

/// Convenience alias that pins the error type to [`DaybookError`].
pub type Result<T> = std::result::Result<T, DaybookError>;

impl DaybookError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::StoreUnavailable(_) => "Could not open the notes database".to_string(),
            Self::Write(e) => format!("Failed to save: {e}"),
            Self::Read(e) => format!("Failed to load: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::EventNotFound(_) => "Event no longer exists".to_string(),
        }
    }
}
