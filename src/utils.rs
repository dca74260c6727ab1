//! Small helpers for logging and output.
//!
//! - String truncation for log previews
//! - JSON rendering of results and failures for the command line

use crate::error::ExtractError;
use crate::models::{ErrorBody, ExtractionResult};

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` characters with an ellipsis and a
/// count of the dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Render a successful extraction as JSON.
pub fn result_json(result: &ExtractionResult, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

/// Render a failed extraction in the outbound failure shape.
pub fn error_json(err: &ExtractError, pretty: bool) -> serde_json::Result<String> {
    let body = ErrorBody {
        error: err.to_string(),
        kind: err.kind(),
    };
    if pretty {
        serde_json::to_string_pretty(&body)
    } else {
        serde_json::to_string(&body)
    }
}
