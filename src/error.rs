// Error types shared by the storage, lookup and controller layers.
// The UI prints these with `Display`, so the messages are written for
// the person at the terminal.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the storage contract (list / add / delete / update).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("The movie '{0}' already exists in the storage.")]
    DuplicateTitle(String),

    #[error("The movie '{0}' does not exist in the storage.")]
    NotFound(String),

    #[error("Movie title cannot be empty.")]
    EmptyTitle,

    #[error("Rating must be between 0 and 10, got {0}.")]
    InvalidRating(f64),

    /// The store file exists but could not be parsed. Nothing is written
    /// while the store is in this state.
    #[error("Store file {} is unreadable: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures of the remote metadata lookup. All variants are reported to
/// the user under the same "Lookup failed" heading.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Unable to connect to the OMDb API. Check your internet connection. ({0})")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to connect to OMDb API: HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("Movie '{title}' not found: {message}")]
    NotFound { title: String, message: String },

    #[error("Unexpected OMDb response: {0}")]
    BadResponse(String),
}

/// Errors surfaced by `MovieApp` operations.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("No metadata lookup is configured (set OMDB_API_KEY).")]
    LookupDisabled,

    #[error("Template file not found at: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("Failed to write the website: {0}")]
    Render(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
