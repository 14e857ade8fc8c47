//! Pagelift - Remote-Browser Upload Orchestration
//!
//! This crate drives one end-to-end upload through a page open in an
//! already-running, remotely-debuggable Chromium browser: attach over the
//! DevTools (CDP) endpoint, stage a local file into the page's file input,
//! invoke the page's upload action, and capture the resulting URL or
//! identifier from the rendered output.
//!
//! # Architecture
//!
//! ```text
//! CLI ──▶ Upload Orchestrator ──▶ Browser Connection (CDP attach)
//!              │                        │
//!              ▼                        ▼
//!        ┌───────────┐           ┌─────────────┐
//!        │ Bounded   │           │ Active Page │
//!        │ waits     │           │ (live view) │
//!        └─────┬─────┘           └──────┬──────┘
//!              │                        │
//!              ▼                        ▼
//!        Actionable poll          Result artifact
//!        + grace delays           Found(text) | Absent
//! ```
//!
//! The browser is an external collaborator: Pagelift never launches one, and
//! detaching leaves it running.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pagelift::browser::EndpointConfig;
//! use pagelift::upload::UploadOrchestrator;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoint = EndpointConfig::default(); // http://127.0.0.1:9222
//!     let orchestrator = UploadOrchestrator::new();
//!
//!     let outcome = orchestrator
//!         .upload_and_capture(Path::new("image.png"), &endpoint)
//!         .await?;
//!
//!     println!("{}", outcome);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod error;
pub mod extraction;
pub mod upload;

// Re-exports for convenience
pub use browser::{BrowserConnection, EndpointConfig};
pub use error::{Error, Result};
pub use extraction::ResultProbe;
pub use upload::{UploadOptions, UploadOrchestrator, UploadOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
