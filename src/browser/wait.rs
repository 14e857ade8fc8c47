//! Bounded waiting primitives
//!
//! The target page re-renders asynchronously and exposes no completion
//! events, so the workflow synchronizes with it two ways: a bounded poll for
//! a condition that can be expressed as a selector, and a fixed grace delay
//! where no such condition exists.

use crate::error::{Result, UploadError};
use chromiumoxide::{Element, Page};
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// Options for bounded selector waits
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Total wait bound in milliseconds (default: 10000)
    pub timeout_ms: u64,
    /// Poll interval in milliseconds (default: 100)
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl WaitOptions {
    /// Wait options with a custom bound and the default poll interval
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Default::default()
        }
    }
}

/// Poll the page until an element matches `selector`, bounded by the wait
/// options.
///
/// Returns the first matching element, or [`UploadError::ActionTimeout`] when
/// the window elapses without a match.
#[instrument(skip(page))]
pub async fn wait_for_selector(
    page: &Page,
    selector: &str,
    options: &WaitOptions,
) -> Result<Element> {
    let bound = Duration::from_millis(options.timeout_ms);
    let interval = Duration::from_millis(options.poll_interval_ms);

    let poll = async {
        loop {
            match page.find_element(selector).await {
                Ok(element) => return element,
                Err(e) => trace!("selector {:?} not present yet: {}", selector, e),
            }
            tokio::time::sleep(interval).await;
        }
    };

    match tokio::time::timeout(bound, poll).await {
        Ok(element) => {
            debug!("selector {:?} matched within {}ms", selector, options.timeout_ms);
            Ok(element)
        }
        Err(_) => Err(UploadError::ActionTimeout(options.timeout_ms).into()),
    }
}

/// Fixed grace delay.
///
/// An approximate synchronization primitive, not a correctness guarantee: it
/// absorbs late layout and enable-state transitions the selector wait cannot
/// express.
pub async fn settle(delay: Duration) {
    trace!("settling for {:?}", delay);
    tokio::time::sleep(delay).await;
}
