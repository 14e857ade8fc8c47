//! Result artifact extraction
//!
//! After the upload action fires, the target page is expected to render its
//! outcome into a single well-known element. This module reads that text.
//! Absence of the element is a valid end state, not a malfunction.

use crate::error::{ExtractionError, Result};
use chromiumoxide::Page;
use tracing::{debug, instrument};

/// Reads the result artifact from a page
pub struct ResultProbe;

impl ResultProbe {
    /// Read the text content of the first element matching `selector`.
    ///
    /// Returns `Ok(None)` when the element is absent or renders no text:
    /// the page either has not produced a result or the action failed
    /// silently on the remote service. CDP failures while reading an element
    /// that does exist are real errors.
    #[instrument(skip(page))]
    pub async fn read(page: &Page, selector: &str) -> Result<Option<String>> {
        let element = match page.find_element(selector).await {
            Ok(element) => element,
            Err(e) => {
                debug!("result element {:?} absent: {}", selector, e);
                return Ok(None);
            }
        };

        let text = element
            .inner_text()
            .await
            .map_err(|e| ExtractionError::ReadFailed(e.to_string()))?;

        Ok(Self::normalize(text))
    }

    /// Trim the raw text and drop empty renders
    fn normalize(text: Option<String>) -> Option<String> {
        text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        assert_eq!(
            ResultProbe::normalize(Some("  https://cdn.example.com/img/abc123.png \n".to_string())),
            Some("https://cdn.example.com/img/abc123.png".to_string())
        );
    }

    #[test]
    fn test_normalize_empty_is_absent() {
        assert_eq!(ResultProbe::normalize(Some("   ".to_string())), None);
        assert_eq!(ResultProbe::normalize(Some(String::new())), None);
        assert_eq!(ResultProbe::normalize(None), None);
    }
}
