//! Terminal outcome of the upload workflow
//!
//! The workflow distinguishes "crashed" (an [`crate::error::Error`]) from
//! "ran fine, nothing found". The latter is a first-class outcome here, not
//! a null.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The literal marker printed for an absent result
pub const ABSENT_MARKER: &str = "(no result)";

/// Result artifact scraped from the page after the upload action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadOutcome {
    /// The result element rendered text (expected to be a URL or identifier;
    /// treated as free text, no structural validation)
    Found(String),
    /// The result element was absent after the wait window, or the expected
    /// action control never appeared. A valid, degraded completion.
    Absent,
}

impl UploadOutcome {
    /// Whether an artifact was captured
    pub fn is_found(&self) -> bool {
        matches!(self, UploadOutcome::Found(_))
    }

    /// The captured text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            UploadOutcome::Found(text) => Some(text),
            UploadOutcome::Absent => None,
        }
    }

    /// Build an outcome from a probe read
    pub fn from_probe(text: Option<String>) -> Self {
        match text {
            Some(text) => UploadOutcome::Found(text),
            None => UploadOutcome::Absent,
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Found(text) => write!(f, "{}", text),
            UploadOutcome::Absent => write!(f, "{}", ABSENT_MARKER),
        }
    }
}
