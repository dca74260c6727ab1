//! Error taxonomy for the extraction pipeline.
//!
//! Only three failures ever leave [`crate::pipeline::Extractor::extract`]:
//! invalid input, a failed fetch, or a page with no recoverable text. Date
//! recovery never produces an error of its own.

use std::time::Duration;
use thiserror::Error;

/// Why a document could not be retrieved.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),
}

/// A failed extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidInput { url: String, reason: String },

    #[error("failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("no article content could be extracted from {url}")]
    NoContent { url: String },
}

impl ExtractError {
    /// The wire name of this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::InvalidInput { .. } => "invalid_input",
            ExtractError::FetchFailed { .. } => "fetch_failed",
            ExtractError::NoContent { .. } => "no_content",
        }
    }

    /// Whether the caller is at fault. Everything else is a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractError::InvalidInput { .. })
    }
}
