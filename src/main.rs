//! # Article Dating
//!
//! Command-line front end for the extraction pipeline. Takes one article URL,
//! prints `{"text": ..., "date": ...}` on success or `{"error": ..., "kind": ...}`
//! on failure.
//!
//! ## Usage
//!
//! ```sh
//! article_dating --url https://example.com/2019/story
//! echo '{"url": "https://example.com/2019/story"}' | article_dating
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: extraction succeeded (the year may still be `null`)
//! - `1`: the page could not be fetched or held no article text
//! - `2`: the URL was rejected before any network access
//!
//! Logs go to stderr so stdout carries only the JSON payload.

use article_dating::utils::{error_json, result_json};
use article_dating::{ExtractError, ExtractionRequest, Extractor};
use clap::Parser;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("article_dating starting up");

    // Parse CLI
    let args = Cli::parse();
    let config = args.extractor_config();
    debug!(url = ?args.url, ?config, "Parsed CLI arguments");

    let extractor = match Extractor::from_config(&config) {
        Ok(extractor) => extractor,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match read_request(args.url.as_deref()).await {
        Ok(request) => extractor.extract_request(&request).await,
        Err(e) => Err(e),
    };
    let (rendered, code) = match &outcome {
        Ok(result) => (result_json(result, args.pretty), ExitCode::SUCCESS),
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Extraction failed");
            (error_json(e, args.pretty), exit_code(e))
        }
    };

    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "Failed to serialize output");
            return ExitCode::FAILURE;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis() as u64, "Execution complete");
    code
}

/// The request named on the command line, or a JSON body read from stdin.
async fn read_request(url: Option<&str>) -> Result<ExtractionRequest, ExtractError> {
    if let Some(url) = url {
        return Ok(ExtractionRequest {
            url: url.to_string(),
        });
    }

    let mut body = String::new();
    tokio::io::stdin()
        .read_to_string(&mut body)
        .await
        .map_err(|e| ExtractError::InvalidInput {
            url: String::new(),
            reason: format!("failed to read request body: {e}"),
        })?;
    ExtractionRequest::from_json(&body)
}

fn exit_code(err: &ExtractError) -> ExitCode {
    if err.is_client_error() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
