//! Pagelift CLI
//!
//! Uploads one local file through the page currently active in a
//! remotely-debugged browser and prints the captured result.

use anyhow::Context;
use clap::Parser;
use pagelift::browser::EndpointConfig;
use pagelift::upload::{UploadOptions, UploadOrchestrator};
use std::path::PathBuf;

/// Pagelift upload CLI
#[derive(Parser, Debug)]
#[command(name = "pagelift")]
#[command(version)]
#[command(about = "Upload a file through a remotely-debugged browser page and capture the result")]
struct Args {
    /// Path to the file to upload
    file: PathBuf,

    /// Remote debugging host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Remote debugging port
    #[arg(short, long, default_value = "9222")]
    port: u16,

    /// Visible-text phrase identifying the action control (case-sensitive)
    #[arg(long, default_value = "Upload")]
    trigger: String,

    /// CSS selector of the element the result is read from
    #[arg(long, default_value = "code")]
    result_selector: String,

    /// Bound on the wait for an enabled control, in milliseconds
    #[arg(long, default_value = "10000")]
    action_timeout_ms: u64,

    /// Bound on the whole workflow, in milliseconds
    #[arg(long, default_value = "60000")]
    workflow_timeout_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let endpoint = EndpointConfig::builder()
        .host(args.host.as_str())
        .port(args.port)
        .build();

    let options = UploadOptions::builder()
        .trigger_phrase(args.trigger.as_str())
        .result_selector(args.result_selector.as_str())
        .action_timeout_ms(args.action_timeout_ms)
        .workflow_timeout_ms(args.workflow_timeout_ms)
        .build();

    let orchestrator = UploadOrchestrator::with_options(options);

    // Soft absence still prints and exits 0; only fatal failures reach the
    // error path and the non-zero exit.
    let outcome = orchestrator
        .upload_and_capture(&args.file, &endpoint)
        .await
        .with_context(|| format!("upload of {} failed", args.file.display()))?;

    println!("{}", outcome);
    Ok(())
}
