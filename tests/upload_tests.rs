//! Upload workflow tests
//!
//! These tests verify the workflow's option surface, outcome semantics, and
//! error taxonomy through the public API. Driving a real upload end-to-end
//! requires a Chrome/Chromium instance with remote debugging enabled and a
//! page matching the upload contract; only the browser-free pieces run here.

use pagelift::error::{ConnectionError, Error, UploadError};
use pagelift::upload::{UploadOptions, UploadOrchestrator, UploadOutcome, ABSENT_MARKER};
use pretty_assertions::assert_eq;

#[test]
fn test_upload_options_default_match_page_contract() {
    let options = UploadOptions::default();

    // The target page contract: one file input, buttons whose label carries
    // the trigger phrase, a <code> element bearing the result.
    assert_eq!(options.input_selector, r#"input[type="file"]"#);
    assert_eq!(options.actionable_selector, "button:not([disabled])");
    assert_eq!(options.control_selector, "button");
    assert_eq!(options.trigger_phrase, "Upload");
    assert_eq!(options.result_selector, "code");
}

#[test]
fn test_upload_options_default_timings() {
    let options = UploadOptions::default();
    assert_eq!(options.action_timeout_ms, 10_000);
    assert_eq!(options.settle_ms, 500);
    assert_eq!(options.result_delay_ms, 2_000);
    assert_eq!(options.workflow_timeout_ms, 60_000);
}

#[test]
fn test_upload_options_builder_roundtrip() {
    let options = UploadOptions::builder()
        .trigger_phrase("Attach")
        .result_selector("output")
        .workflow_timeout_ms(15_000)
        .build();

    let orchestrator = UploadOrchestrator::with_options(options);
    assert_eq!(orchestrator.options().trigger_phrase, "Attach");
    assert_eq!(orchestrator.options().result_selector, "output");
    assert_eq!(orchestrator.options().workflow_timeout_ms, 15_000);
    // Untouched fields keep their defaults
    assert_eq!(orchestrator.options().input_selector, r#"input[type="file"]"#);
}

#[test]
fn test_options_serde_defaults() {
    let options: UploadOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options.trigger_phrase, "Upload");

    let options: UploadOptions =
        serde_json::from_str(r#"{"result_selector":"pre","settle_ms":100}"#).unwrap();
    assert_eq!(options.result_selector, "pre");
    assert_eq!(options.settle_ms, 100);
    assert_eq!(options.action_timeout_ms, 10_000);
}

#[test]
fn test_outcome_found_vs_absent() {
    let found = UploadOutcome::Found("https://cdn.example.com/img/abc123.png".to_string());
    assert!(found.is_found());
    assert_eq!(found.to_string(), "https://cdn.example.com/img/abc123.png");

    let absent = UploadOutcome::Absent;
    assert!(!absent.is_found());
    assert_eq!(absent.to_string(), ABSENT_MARKER);

    // Callers can always tell "ran fine, nothing found" from a real artifact
    assert_ne!(found, absent);
    assert_ne!(UploadOutcome::Found(ABSENT_MARKER.to_string()).text(), None);
}

#[test]
fn test_error_kinds_are_distinct() {
    // Fatal kinds a caller may branch on: connect failures, page contract
    // violations, and the two timeout flavors.
    let errors: Vec<Error> = vec![
        ConnectionError::Unreachable {
            endpoint: "http://127.0.0.1:9222".to_string(),
            reason: "refused".to_string(),
        }
        .into(),
        ConnectionError::NoPages.into(),
        UploadError::InputNotFound(r#"input[type="file"]"#.to_string()).into(),
        UploadError::FileUnreadable {
            path: "/tmp/nope.png".to_string(),
            reason: "No such file or directory".to_string(),
        }
        .into(),
        UploadError::ActionTimeout(10_000).into(),
        UploadError::WorkflowTimeout(60_000).into(),
    ];

    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    for (i, a) in rendered.iter().enumerate() {
        for b in rendered.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_action_timeout_is_not_a_connection_error() {
    let err: Error = UploadError::ActionTimeout(10_000).into();
    assert!(matches!(err, Error::Upload(_)));
    assert!(!matches!(err, Error::Connection(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_fatal() {
    // Port 1 on loopback should refuse; the orchestrator must surface a
    // connection failure rather than hang or degrade to Absent.
    let endpoint = pagelift::browser::EndpointConfig::builder()
        .host("127.0.0.1")
        .port(1)
        .attach_settle_ms(0)
        .build();

    let orchestrator = UploadOrchestrator::with_options(
        UploadOptions::builder().workflow_timeout_ms(5_000).build(),
    );

    let err = orchestrator
        .upload_and_capture(std::path::Path::new("does-not-matter.png"), &endpoint)
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            Error::Connection(ConnectionError::Unreachable { .. })
                | Error::Upload(UploadError::WorkflowTimeout(_))
        ),
        "unexpected error: {err:?}"
    );
}
