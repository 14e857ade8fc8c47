//! Upload workflow
//!
//! One end-to-end operation: stage a local file into the active page's file
//! input, trigger the page's upload action, and capture the resulting
//! artifact. See [`UploadOrchestrator::upload_and_capture`].

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::{UploadOptions, UploadOptionsBuilder, UploadOrchestrator};
pub use outcome::{UploadOutcome, ABSENT_MARKER};
