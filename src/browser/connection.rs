//! Browser attachment lifecycle
//!
//! This module owns the connection to the remote debugging endpoint: attach,
//! page selection, and detach. The browser process itself is external and is
//! never started or stopped from here.

use crate::error::{ConnectionError, Result};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Configuration for the remote debugging endpoint
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Host the browser is listening on (default: 127.0.0.1)
    pub host: String,
    /// Remote debugging port (default: 9222)
    pub port: u16,
    /// Delay after attach while the target list syncs, in ms (default: 300)
    pub attach_settle_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9222,
            attach_settle_ms: 300,
        }
    }
}

impl EndpointConfig {
    /// Create a new config builder
    pub fn builder() -> EndpointConfigBuilder {
        EndpointConfigBuilder::default()
    }

    /// The debugging URL the browser is expected to be listening on
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Builder for EndpointConfig
#[derive(Default)]
pub struct EndpointConfigBuilder {
    config: EndpointConfig,
}

impl EndpointConfigBuilder {
    /// Set the host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the post-attach settle delay
    pub fn attach_settle_ms(mut self, ms: u64) -> Self {
        self.config.attach_settle_ms = ms;
        self
    }

    /// Build the config
    pub fn build(self) -> EndpointConfig {
        self.config
    }
}

/// An exclusive handle to an attached remote browser.
///
/// Exactly one connection is live per workflow invocation. It is created by
/// [`BrowserConnection::attach`] and released by [`BrowserConnection::detach`];
/// there is no implicit reconnect.
pub struct BrowserConnection {
    browser: Browser,
    handler: JoinHandle<()>,
    endpoint: String,
}

impl BrowserConnection {
    /// Attach to the browser at the configured endpoint.
    ///
    /// Fails with [`ConnectionError::Unreachable`] when nothing compatible is
    /// listening there.
    #[instrument]
    pub async fn attach(config: &EndpointConfig) -> Result<Self> {
        let endpoint = config.url();
        info!("Attaching to browser at {}", endpoint);

        let (browser, mut handler) =
            Browser::connect(&endpoint)
                .await
                .map_err(|e| ConnectionError::Unreachable {
                    endpoint: endpoint.clone(),
                    reason: e.to_string(),
                })?;

        // Drain CDP events in the background for the lifetime of the attach
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    warn!("Browser handler event error");
                    break;
                }
            }
            debug!("Browser handler finished");
        });

        // The target list may lag right after attach
        tokio::time::sleep(Duration::from_millis(config.attach_settle_ms)).await;

        info!("Attached to {}", endpoint);

        Ok(Self {
            browser,
            handler: handler_task,
            endpoint,
        })
    }

    /// Select the most-recently-created page from the browser's open tab set.
    ///
    /// Fails with [`ConnectionError::NoPages`] when the tab set is empty. The
    /// page is a live view into browser-managed state; tabs may still close or
    /// navigate underneath the caller.
    #[instrument(skip(self))]
    pub async fn latest_page(&self) -> Result<Page> {
        let pages = self.browser.pages().await?;
        debug!("Endpoint reports {} open page(s)", pages.len());

        pages
            .into_iter()
            .last()
            .ok_or_else(|| ConnectionError::NoPages.into())
    }

    /// The endpoint URL this connection is attached to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Release the connection.
    ///
    /// Dropping the attach handle leaves the external browser running; only
    /// the event handler task is stopped. Callers must reach this on every
    /// exit path, including early workflow failures.
    #[instrument(skip(self))]
    pub async fn detach(mut self) {
        info!("Detaching from {}", self.endpoint);

        drop(self.browser);
        self.handler.abort();

        // Bounded wait for the handler to wind down
        let _ = tokio::time::timeout(Duration::from_secs(5), &mut self.handler).await;

        debug!("Detached");
    }
}
