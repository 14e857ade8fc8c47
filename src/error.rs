//! Error types for Pagelift
//!
//! This module provides the error type hierarchy using `thiserror`.
//! Fatal workflow failures live here; the soft "ran fine, nothing found"
//! outcomes are modeled by [`crate::upload::UploadOutcome`], not by errors.

use thiserror::Error;

/// The main error type for Pagelift operations
#[derive(Error, Debug)]
pub enum Error {
    /// Browser attachment errors
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Upload workflow errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Result extraction errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),
}

/// Errors attaching to or selecting pages from the remote debugging endpoint
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The debugging endpoint did not accept the connection
    #[error("Browser unreachable at {endpoint}: {reason}")]
    Unreachable {
        /// The endpoint URL that was attempted
        endpoint: String,
        /// Underlying failure reason
        reason: String,
    },

    /// The browser has no open pages to drive
    #[error("No open pages at the debugging endpoint")]
    NoPages,
}

/// Errors during the upload workflow proper
#[derive(Error, Debug)]
pub enum UploadError {
    /// The expected file-input control is missing from the page
    #[error("File input not found: {0}")]
    InputNotFound(String),

    /// The upload target path does not exist or cannot be read
    #[error("Cannot read upload file {path}: {reason}")]
    FileUnreadable {
        /// The path that was handed to the page
        path: String,
        /// Underlying failure reason
        reason: String,
    },

    /// No enabled control appeared within the bounded wait.
    /// Distinct from [`ConnectionError`]: the browser answered, the page did not.
    #[error("No enabled control appeared within {0}ms")]
    ActionTimeout(u64),

    /// The whole workflow exceeded its overall bound
    #[error("Upload workflow exceeded {0}ms")]
    WorkflowTimeout(u64),
}

/// Errors while reading the result artifact from the page
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The result element exists but its text could not be read
    #[error("Result read failed: {0}")]
    ReadFailed(String),
}

/// Result type alias for Pagelift operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}
