//! Upload orchestration state machine
//!
//! The orchestrator executes one end-to-end pass over an externally-owned,
//! asynchronously-rendered page:
//!
//! ```text
//! Idle → Connected → PageAcquired → InputLocated → FileStaged
//!      → ActionReady → Dispatched → ResultRead → Disconnected
//! ```
//!
//! Every state transitions to Disconnected on failure; the connection is
//! released on every exit path. Exactly one upload attempt happens per
//! invocation, and there is no compensating action once the page has been
//! mutated.

use crate::browser::{self, BrowserConnection, EndpointConfig, WaitOptions};
use crate::error::{Error, Result, UploadError};
use crate::extraction::ResultProbe;
use crate::upload::UploadOutcome;
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::{Element, Page};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

/// Options for the upload workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Selector of the file-input control the file is staged into
    #[serde(default = "default_input_selector")]
    pub input_selector: String,
    /// Selector whose appearance marks the page as actionable
    #[serde(default = "default_actionable_selector")]
    pub actionable_selector: String,
    /// Selector enumerating candidate action controls
    #[serde(default = "default_control_selector")]
    pub control_selector: String,
    /// Case-sensitive substring identifying the action control by its label
    #[serde(default = "default_trigger_phrase")]
    pub trigger_phrase: String,
    /// Selector of the element the result artifact is read from
    #[serde(default = "default_result_selector")]
    pub result_selector: String,
    /// Bound on the wait for an actionable control, in ms
    #[serde(default = "default_action_timeout_ms")]
    pub action_timeout_ms: u64,
    /// Poll interval for the actionable wait, in ms
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Grace delay after the actionable control appears, in ms
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Grace delay between dispatch and the result read, in ms
    #[serde(default = "default_result_delay_ms")]
    pub result_delay_ms: u64,
    /// Bound on the whole workflow, in ms
    #[serde(default = "default_workflow_timeout_ms")]
    pub workflow_timeout_ms: u64,
}

fn default_input_selector() -> String {
    r#"input[type="file"]"#.to_string()
}

fn default_actionable_selector() -> String {
    "button:not([disabled])".to_string()
}

fn default_control_selector() -> String {
    "button".to_string()
}

fn default_trigger_phrase() -> String {
    "Upload".to_string()
}

fn default_result_selector() -> String {
    "code".to_string()
}

fn default_action_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_settle_ms() -> u64 {
    500
}

fn default_result_delay_ms() -> u64 {
    2_000
}

fn default_workflow_timeout_ms() -> u64 {
    60_000
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            input_selector: default_input_selector(),
            actionable_selector: default_actionable_selector(),
            control_selector: default_control_selector(),
            trigger_phrase: default_trigger_phrase(),
            result_selector: default_result_selector(),
            action_timeout_ms: default_action_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_ms: default_settle_ms(),
            result_delay_ms: default_result_delay_ms(),
            workflow_timeout_ms: default_workflow_timeout_ms(),
        }
    }
}

impl UploadOptions {
    /// Create a new options builder
    pub fn builder() -> UploadOptionsBuilder {
        UploadOptionsBuilder::default()
    }
}

/// Builder for UploadOptions
#[derive(Default)]
pub struct UploadOptionsBuilder {
    options: UploadOptions,
}

impl UploadOptionsBuilder {
    /// Set the file-input selector
    pub fn input_selector<S: Into<String>>(mut self, selector: S) -> Self {
        self.options.input_selector = selector.into();
        self
    }

    /// Set the actionable-control selector
    pub fn actionable_selector<S: Into<String>>(mut self, selector: S) -> Self {
        self.options.actionable_selector = selector.into();
        self
    }

    /// Set the control enumeration selector
    pub fn control_selector<S: Into<String>>(mut self, selector: S) -> Self {
        self.options.control_selector = selector.into();
        self
    }

    /// Set the trigger phrase
    pub fn trigger_phrase<S: Into<String>>(mut self, phrase: S) -> Self {
        self.options.trigger_phrase = phrase.into();
        self
    }

    /// Set the result selector
    pub fn result_selector<S: Into<String>>(mut self, selector: S) -> Self {
        self.options.result_selector = selector.into();
        self
    }

    /// Set the actionable wait bound
    pub fn action_timeout_ms(mut self, ms: u64) -> Self {
        self.options.action_timeout_ms = ms;
        self
    }

    /// Set the actionable wait poll interval
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.options.poll_interval_ms = ms;
        self
    }

    /// Set the post-actionable settle delay
    pub fn settle_ms(mut self, ms: u64) -> Self {
        self.options.settle_ms = ms;
        self
    }

    /// Set the dispatch-to-read delay
    pub fn result_delay_ms(mut self, ms: u64) -> Self {
        self.options.result_delay_ms = ms;
        self
    }

    /// Set the overall workflow bound
    pub fn workflow_timeout_ms(mut self, ms: u64) -> Self {
        self.options.workflow_timeout_ms = ms;
        self
    }

    /// Build the options
    pub fn build(self) -> UploadOptions {
        self.options
    }
}

/// Executes the upload-and-capture workflow
#[derive(Debug, Default)]
pub struct UploadOrchestrator {
    options: UploadOptions,
}

impl UploadOrchestrator {
    /// Create an orchestrator with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an orchestrator with custom options
    pub fn with_options(options: UploadOptions) -> Self {
        Self { options }
    }

    /// The orchestrator's options
    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Upload `path` through the page currently active at `endpoint` and
    /// capture the result artifact.
    ///
    /// Fatal failures (unreachable browser, no pages, missing input, bad
    /// path, actionable timeout) abort with an error; a missing action
    /// control or result element completes with [`UploadOutcome::Absent`].
    /// All steps share one overall deadline, and the connection is released
    /// on every exit path, the deadline expiry included.
    #[instrument(skip(self))]
    pub async fn upload_and_capture(
        &self,
        path: &Path,
        endpoint: &EndpointConfig,
    ) -> Result<UploadOutcome> {
        let bound_ms = self.options.workflow_timeout_ms;
        let deadline = Instant::now() + Duration::from_millis(bound_ms);

        let connection = match timeout_at(deadline, BrowserConnection::attach(endpoint)).await {
            Ok(attached) => attached?,
            Err(_) => return Err(UploadError::WorkflowTimeout(bound_ms).into()),
        };

        let outcome = match timeout_at(deadline, self.drive(&connection, path)).await {
            Ok(result) => result,
            Err(_) => Err(UploadError::WorkflowTimeout(bound_ms).into()),
        };

        connection.detach().await;
        outcome
    }

    /// Steps 2-8: acquire the page, stage the file, fire the action, read
    /// the result. Runs under the caller's deadline.
    async fn drive(&self, connection: &BrowserConnection, path: &Path) -> Result<UploadOutcome> {
        let page = connection.latest_page().await?;
        let input = self.locate_input(&page).await?;
        self.stage(&page, &input, path).await?;

        // The page re-renders after file selection with no completion event;
        // a bounded poll for an enabled control is the only usable signal.
        let wait = WaitOptions {
            timeout_ms: self.options.action_timeout_ms,
            poll_interval_ms: self.options.poll_interval_ms,
        };
        browser::wait_for_selector(&page, &self.options.actionable_selector, &wait).await?;
        browser::settle(Duration::from_millis(self.options.settle_ms)).await;

        self.dispatch(&page).await?;

        browser::settle(Duration::from_millis(self.options.result_delay_ms)).await;
        let text = ResultProbe::read(&page, &self.options.result_selector).await?;

        Ok(UploadOutcome::from_probe(text))
    }

    /// Step 3: the page must expose the file-input control up front
    async fn locate_input(&self, page: &Page) -> Result<Element> {
        match page.find_element(&self.options.input_selector).await {
            Ok(element) => Ok(element),
            Err(e) => {
                debug!("file input lookup failed: {}", e);
                Err(UploadError::InputNotFound(self.options.input_selector.clone()).into())
            }
        }
    }

    /// Step 4: hand the local path to the located input via
    /// `DOM.setFileInputFiles`, after checking the file is actually readable
    #[instrument(skip(self, page, input))]
    async fn stage(&self, page: &Page, input: &Element, path: &Path) -> Result<()> {
        let staged = validate_upload_target(path).await?;
        info!(
            "Staging {} into {}",
            staged.display(),
            self.options.input_selector
        );

        let mut params = SetFileInputFilesParams::new(vec![staged.to_string_lossy().into_owned()]);
        params.backend_node_id = Some(input.backend_node_id.clone());

        page.execute(params).await.map_err(Error::from)?;
        Ok(())
    }

    /// Step 7: invoke the first control whose visible label contains the
    /// trigger phrase. No match is a soft no-op so that pages without the
    /// expected control degrade to an absent result instead of aborting.
    #[instrument(skip(self, page))]
    async fn dispatch(&self, page: &Page) -> Result<()> {
        let controls = match page.find_elements(&self.options.control_selector).await {
            Ok(controls) => controls,
            Err(e) => {
                debug!("control enumeration failed: {}", e);
                Vec::new()
            }
        };

        for control in controls {
            let label = match control.inner_text().await {
                Ok(Some(label)) => label,
                _ => continue,
            };
            if matches_trigger(&label, &self.options.trigger_phrase) {
                info!("Invoking control labeled {:?}", label.trim());
                control.click().await?;
                return Ok(());
            }
        }

        warn!(
            "No control labeled with {:?}; leaving the page untouched",
            self.options.trigger_phrase
        );
        Ok(())
    }
}

/// Case-sensitive substring match over a control's visible label
fn matches_trigger(label: &str, phrase: &str) -> bool {
    label.contains(phrase)
}

/// Check the upload target exists and is a regular file, resolving it to an
/// absolute path. The browser process resolves relative paths against its own
/// working directory, not ours.
pub(crate) async fn validate_upload_target(path: &Path) -> Result<PathBuf> {
    let unreadable = |reason: String| UploadError::FileUnreadable {
        path: path.display().to_string(),
        reason,
    };

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| unreadable(e.to_string()))?;

    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_string()).into());
    }

    let absolute = tokio::fs::canonicalize(path)
        .await
        .map_err(|e| unreadable(e.to_string()))?;

    Ok(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_upload_options_default() {
        let options = UploadOptions::default();
        assert_eq!(options.input_selector, r#"input[type="file"]"#);
        assert_eq!(options.actionable_selector, "button:not([disabled])");
        assert_eq!(options.control_selector, "button");
        assert_eq!(options.trigger_phrase, "Upload");
        assert_eq!(options.result_selector, "code");
        assert_eq!(options.action_timeout_ms, 10_000);
        assert_eq!(options.poll_interval_ms, 100);
        assert_eq!(options.settle_ms, 500);
        assert_eq!(options.result_delay_ms, 2_000);
        assert_eq!(options.workflow_timeout_ms, 60_000);
    }

    #[test]
    fn test_upload_options_builder() {
        let options = UploadOptions::builder()
            .input_selector("#picker")
            .actionable_selector("button.ready")
            .control_selector("button, [role=button]")
            .trigger_phrase("Send")
            .result_selector("pre.result")
            .action_timeout_ms(5_000)
            .poll_interval_ms(50)
            .settle_ms(250)
            .result_delay_ms(1_000)
            .workflow_timeout_ms(30_000)
            .build();

        assert_eq!(options.input_selector, "#picker");
        assert_eq!(options.actionable_selector, "button.ready");
        assert_eq!(options.control_selector, "button, [role=button]");
        assert_eq!(options.trigger_phrase, "Send");
        assert_eq!(options.result_selector, "pre.result");
        assert_eq!(options.action_timeout_ms, 5_000);
        assert_eq!(options.poll_interval_ms, 50);
        assert_eq!(options.settle_ms, 250);
        assert_eq!(options.result_delay_ms, 1_000);
        assert_eq!(options.workflow_timeout_ms, 30_000);
    }

    #[test]
    fn test_options_deserialize_fills_defaults() {
        let options: UploadOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.trigger_phrase, "Upload");
        assert_eq!(options.workflow_timeout_ms, 60_000);

        let options: UploadOptions =
            serde_json::from_str(r#"{"trigger_phrase":"Send"}"#).unwrap();
        assert_eq!(options.trigger_phrase, "Send");
        assert_eq!(options.result_selector, "code");
    }

    #[test]
    fn test_trigger_match_is_case_sensitive_substring() {
        assert!(matches_trigger("Upload Image", "Upload"));
        assert!(matches_trigger("Re-Upload", "Upload"));
        assert!(!matches_trigger("UPLOAD IMAGE", "Upload"));
        assert!(!matches_trigger("upload image", "Upload"));
        assert!(!matches_trigger("Submit", "Upload"));
    }

    #[tokio::test]
    async fn test_validate_upload_target_missing_file() {
        let missing = std::env::temp_dir().join("pagelift-definitely-missing.png");
        let err = validate_upload_target(&missing).await.unwrap_err();

        match err {
            Error::Upload(UploadError::FileUnreadable { path, .. }) => {
                assert!(path.contains("pagelift-definitely-missing.png"));
            }
            other => panic!("expected FileUnreadable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validate_upload_target_rejects_directory() {
        let err = validate_upload_target(&std::env::temp_dir())
            .await
            .unwrap_err();

        match err {
            Error::Upload(UploadError::FileUnreadable { reason, .. }) => {
                assert_eq!(reason, "not a regular file");
            }
            other => panic!("expected FileUnreadable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validate_upload_target_resolves_absolute() {
        let file = std::env::temp_dir().join("pagelift-stage-check.png");
        std::fs::write(&file, b"\x89PNG\r\n").unwrap();

        let staged = validate_upload_target(&file).await.unwrap();
        assert!(staged.is_absolute());

        std::fs::remove_file(&file).unwrap();
    }
}
