//! Command-line interface definitions for Article Dating.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Tunable options can also be provided via environment variables.

use article_dating::pipeline::{DEFAULT_TIMEOUT, ExtractorConfig};
use clap::Parser;
use std::time::Duration;

/// Command-line arguments for the Article Dating application.
///
/// # Examples
///
/// ```sh
/// # Extract one article
/// article_dating --url https://example.com/2019/story
///
/// # Same request as a JSON body on stdin
/// echo '{"url": "https://example.com/2019/story"}' | article_dating
///
/// # Longer timeout, no body-text date scan, pretty output
/// article_dating -u https://example.com/story --timeout-secs 30 --no-body-text-dates --pretty
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URL of the article to extract; read `{"url": ...}` from stdin when absent
    #[arg(short, long)]
    pub url: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long, env = "EXTRACT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Skip scanning the article body for a written date
    #[arg(long, env = "EXTRACT_NO_BODY_TEXT_DATES")]
    pub no_body_text_dates: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// The extractor configuration these arguments describe.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            body_text_dates: !self.no_body_text_dates,
        }
    }
}
