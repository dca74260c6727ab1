//! Generic boilerplate removal.
//!
//! [`ContentParser`] runs Readability (via `dom_smoothie`) over the raw markup
//! to pick the main content block, then keeps that block's paragraphs,
//! dropping captions, asides and one-line prompts. It also resolves a publish
//! timestamp from structured data when the page has one.
//!
//! When Readability cannot find a content block at all the text comes back
//! empty, which hands the document over to [`crate::recovery::text`].

use crate::document::{Document, collapse_whitespace, has_ancestor, visible_text};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dom_smoothie::{Config, Readability};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, instrument};

/// Paragraphs under these elements are page furniture.
const FURNITURE: [&str; 4] = ["aside", "nav", "figure", "footer"];

/// Paragraphs this short are bylines, captions or share prompts.
const MIN_PARAGRAPH_CHARS: usize = 25;

/// Upper bound on elements Readability will walk before giving up.
const MAX_ELEMENTS: usize = 9000;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));
static JSON_LD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script[type=\"application/ld+json\"]").expect("static selector")
});
static ITEMPROP_PUBLISHED: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[itemprop=\"datePublished\"]").expect("static selector"));
static TIME_PUBDATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time[pubdate]").expect("static selector"));

/// What a boilerplate parser recovered from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArticle {
    /// Main body text; empty when nothing recognisable was found.
    pub text: String,
    /// Publish date from structured data, if the page declared one.
    pub publish_date: Option<NaiveDate>,
}

/// Trait for generic main-content extraction.
pub trait BoilerplateParser {
    fn parse(&self, document: &Document) -> ParsedArticle;
}

/// Default [`BoilerplateParser`], backed by Readability.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentParser;

impl BoilerplateParser for ContentParser {
    #[instrument(level = "debug", skip_all)]
    fn parse(&self, document: &Document) -> ParsedArticle {
        let text = main_text(&document.raw);
        let publish_date = publish_date(&document.tree);
        debug!(chars = text.chars().count(), ?publish_date, "Boilerplate parse complete");
        ParsedArticle { text, publish_date }
    }
}

fn main_text(raw: &str) -> String {
    let cfg = Config {
        max_elements_to_parse: MAX_ELEMENTS,
        ..Default::default()
    };

    let article = match Readability::new(raw, None, Some(cfg)).and_then(|mut r| r.parse()) {
        Ok(article) => article,
        Err(e) => {
            debug!(error = %e, "Readability found no content block");
            return String::new();
        }
    };

    let content = Html::parse_fragment(&article.content);
    let paragraphs = content
        .select(&PARAGRAPH)
        .filter(|p| !has_ancestor(*p, &FURNITURE))
        .map(visible_text)
        .filter(|t| t.chars().count() > MIN_PARAGRAPH_CHARS)
        .join("\n\n");
    if !paragraphs.is_empty() {
        return paragraphs;
    }

    // Content blocks made of bare text and line breaks have no <p> to keep.
    let text = collapse_whitespace(&article.text_content);
    if text.chars().count() > MIN_PARAGRAPH_CHARS {
        text
    } else {
        debug!(chars = text.chars().count(), "Content block too short; discarding");
        String::new()
    }
}

/// Resolve a publish date from JSON-LD, microdata, or `<time pubdate>`.
fn publish_date(tree: &Html) -> Option<NaiveDate> {
    let from_json_ld = tree
        .select(&JSON_LD)
        .filter_map(|script| serde_json::from_str::<Value>(&script.text().collect::<String>()).ok())
        .find_map(|value| json_ld_date_published(&value));

    from_json_ld
        .or_else(|| {
            tree.select(&ITEMPROP_PUBLISHED).find_map(|e| {
                let attrs = e.value();
                attrs
                    .attr("content")
                    .or_else(|| attrs.attr("datetime"))
                    .and_then(parse_timestamp)
            })
        })
        .or_else(|| {
            tree.select(&TIME_PUBDATE)
                .find_map(|e| e.value().attr("datetime").and_then(parse_timestamp))
        })
}

fn json_ld_date_published(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Array(items) => items.iter().find_map(json_ld_date_published),
        Value::Object(map) => map
            .get("datePublished")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .or_else(|| map.get("@graph").and_then(json_ld_date_published)),
        _ => None,
    }
}

/// Parse the timestamp shapes publishers put in structured data.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    let prefix: String = raw.chars().take(10).collect();
    NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").ok()
}
