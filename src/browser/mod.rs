//! Remote browser attachment
//!
//! This module connects to an already-running, remotely-debuggable browser
//! over its DevTools endpoint and provides the bounded waiting primitives the
//! upload workflow is built on. Pagelift never launches a browser itself.

pub mod connection;
pub mod wait;

pub use connection::{BrowserConnection, EndpointConfig, EndpointConfigBuilder};
pub use wait::{settle, wait_for_selector, WaitOptions};
