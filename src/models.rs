//! Data models for extraction requests, results, and date candidates.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`ExtractionRequest`]: The single inbound field, a URL string
//! - [`ExtractionResult`]: Recovered body text plus an optional publication year
//! - [`DateCandidate`] / [`DateSource`]: Which strategy produced the year
//! - [`ErrorBody`]: The outbound failure shape
//!
//! The result serializes its year under the `date` key to match the shape
//! consumers of the extractor already expect.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inbound extraction request.
///
/// The command line reads one from stdin when `--url` is not given, and
/// [`crate::pipeline::Extractor::extract_request`] runs it. The URL is checked
/// by [`crate::pipeline::validate_url`] before anything touches the network.
///
/// # JSON Shape
///
/// ```text
/// { "url": "https://example.com/2019/story" }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionRequest {
    /// The article URL to extract.
    pub url: String,
}

impl ExtractionRequest {
    /// Decode a request body. A body that is not `{"url": "..."}` is the
    /// caller's fault and maps to `InvalidInput`.
    pub fn from_json(body: &str) -> Result<Self, ExtractError> {
        serde_json::from_str(body).map_err(|e| ExtractError::InvalidInput {
            url: String::new(),
            reason: format!("malformed request body: {e}"),
        })
    }
}

/// The outcome of a successful extraction.
///
/// Produced once per request and never mutated afterwards.
///
/// # JSON Shape
///
/// ```text
/// { "text": "Body of the article...", "date": 2019 }
/// { "text": "Body of the article...", "date": null }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractionResult {
    /// The recovered article body.
    pub text: String,
    /// The four-digit publication year, if any strategy produced one.
    #[serde(rename = "date")]
    pub year: Option<i32>,
}

/// Where a publication year candidate came from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// The publish timestamp resolved by the boilerplate parser.
    MetadataPrimary,
    /// A known publication-date `<meta>` tag.
    MetaTag,
    /// A four-digit segment of the URL path.
    UrlPath,
    /// A date pattern near the top of the recovered body text.
    BodyText,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateSource::MetadataPrimary => "metadata_primary",
            DateSource::MetaTag => "meta_tag",
            DateSource::UrlPath => "url_path",
            DateSource::BodyText => "body_text",
        };
        f.write_str(name)
    }
}

/// A year accepted by one strategy of the date chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCandidate {
    pub year: i32,
    pub source: DateSource,
}

/// The outbound failure shape.
///
/// `kind` is one of `invalid_input`, `fetch_failed` or `no_content`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}
