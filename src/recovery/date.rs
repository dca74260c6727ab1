//! Date-Recovery Chain.
//!
//! Picks a publication year from up to four sources, most authoritative first:
//!
//! 1. [`PublishDateStrategy`]: the publish date the boilerplate parser resolved
//! 2. [`MetaTagStrategy`]: well-known publication-date `<meta>` tags
//! 3. [`UrlPathStrategy`]: a four-digit year segment in the URL path
//! 4. [`BodyTextStrategy`]: a date written near the top of the article (optional)
//!
//! The first strategy to produce a year inside [`YearBounds`] wins. A strategy
//! that trips over malformed input reports [`StrategyOutcome::Failed`], which
//! is logged and treated exactly like finding nothing. Nothing in this module
//! can fail an extraction.

use crate::models::{DateCandidate, DateSource};
use chrono::{Datelike, Local, NaiveDate};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Earliest publication year accepted from any source.
pub const MIN_YEAR: i32 = 1990;

/// Publication-date meta tags, in lookup order.
pub const META_TAGS: [&str; 7] = [
    "article:published_time",
    "date",
    "pubdate",
    "publishdate",
    "og:published_time",
    "datePublished",
    "article.published",
];

/// Formats tried against the leading characters of a meta tag value.
const META_FORMATS: [DateFormat; 3] = [
    DateFormat::Calendar("%Y-%m-%d"),
    DateFormat::Calendar("%Y/%m/%d"),
    DateFormat::YearOnly,
];

/// How many leading characters of a meta tag value are parsed.
const META_PREFIX_CHARS: usize = 10;

/// How many leading lines of the body are scanned for a written date.
const BODY_SCAN_LINES: usize = 3;

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December";
const MONTH_ABBREVIATIONS: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec";

/// Written-date patterns, in priority order. Each captures `year`.
static BODY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"\b(?:{MONTHS})\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+(?P<year>\d{{4}})\b"),
        format!(r"\b(?:{MONTH_ABBREVIATIONS})\.?\s+\d{{1,2}},?\s+(?P<year>\d{{4}})\b"),
        format!(r"\b\d{{1,2}}\s+(?:{MONTHS}),?\s+(?P<year>\d{{4}})\b"),
        r"\b\d{1,2}/\d{1,2}/(?P<year>\d{4})\b".to_string(),
        r"\b(?P<year>\d{4})-\d{2}-\d{2}\b".to_string(),
    ]
    .iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(%pattern, error = %e, "Dropping invalid date pattern");
            None
        }
    })
    .collect()
});

/// Inclusive range of plausible publication years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    /// [`MIN_YEAR`] through `current_year`.
    pub fn up_to(current_year: i32) -> Self {
        Self {
            min: MIN_YEAR,
            max: current_year,
        }
    }

    /// [`MIN_YEAR`] through the current local year, read now.
    pub fn for_today() -> Self {
        Self::up_to(Local::now().year())
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// What a single strategy came back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// A year was found.
    Found(i32),
    /// The source carried no date at all.
    NoSignal,
    /// The source looked like a date but could not be used.
    Failed(String),
}

/// Everything the date strategies may look at.
#[derive(Debug, Clone, Copy)]
pub struct DateContext<'a> {
    pub publish_date: Option<NaiveDate>,
    pub meta: &'a HashMap<String, String>,
    pub url: &'a Url,
    pub text: &'a str,
    pub bounds: YearBounds,
}

/// One independent source of a publication year.
pub trait DateStrategy {
    fn source(&self) -> DateSource;
    fn find(&self, ctx: &DateContext<'_>) -> StrategyOutcome;
}

/// Uses the publish date the boilerplate parser resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishDateStrategy;

impl DateStrategy for PublishDateStrategy {
    fn source(&self) -> DateSource {
        DateSource::MetadataPrimary
    }

    fn find(&self, ctx: &DateContext<'_>) -> StrategyOutcome {
        match ctx.publish_date {
            Some(date) => StrategyOutcome::Found(date.year()),
            None => StrategyOutcome::NoSignal,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DateFormat {
    /// A chrono format string for a full calendar date.
    Calendar(&'static str),
    /// Exactly four digits.
    YearOnly,
}

impl DateFormat {
    fn year(&self, s: &str) -> Option<i32> {
        match self {
            DateFormat::Calendar(fmt) => NaiveDate::parse_from_str(s, fmt).ok().map(|d| d.year()),
            DateFormat::YearOnly => (s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()))
                .then(|| s.parse().ok())
                .flatten(),
        }
    }
}

/// Reads the first known publication-date meta tag present on the page.
///
/// Only that tag is considered. Its leading characters are tried against each
/// format in order; if none parses, the strategy fails softly rather than
/// moving on to the next tag name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaTagStrategy;

impl DateStrategy for MetaTagStrategy {
    fn source(&self) -> DateSource {
        DateSource::MetaTag
    }

    fn find(&self, ctx: &DateContext<'_>) -> StrategyOutcome {
        let Some((tag, value)) = META_TAGS
            .iter()
            .find_map(|tag| ctx.meta.get(*tag).map(|value| (*tag, value)))
        else {
            return StrategyOutcome::NoSignal;
        };

        let prefix: String = value.chars().take(META_PREFIX_CHARS).collect();
        match META_FORMATS.iter().find_map(|format| format.year(&prefix)) {
            Some(year) => {
                debug!(tag, %prefix, year, "Parsed meta tag date");
                StrategyOutcome::Found(year)
            }
            None => StrategyOutcome::Failed(format!("meta tag {tag} has unparseable value {value:?}")),
        }
    }
}

/// Accepts the first path segment that is a four-digit year within bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlPathStrategy;

impl DateStrategy for UrlPathStrategy {
    fn source(&self) -> DateSource {
        DateSource::UrlPath
    }

    fn find(&self, ctx: &DateContext<'_>) -> StrategyOutcome {
        let Some(segments) = ctx.url.path_segments() else {
            return StrategyOutcome::NoSignal;
        };

        segments
            .filter(|seg| seg.len() == 4 && seg.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|seg| seg.parse::<i32>().ok())
            .find(|year| ctx.bounds.contains(*year))
            .map_or(StrategyOutcome::NoSignal, StrategyOutcome::Found)
    }
}

/// Scans the first lines of the recovered text for a written date.
///
/// The first pattern that matches decides: its year is used if it is within
/// bounds, otherwise this strategy yields nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyTextStrategy;

impl DateStrategy for BodyTextStrategy {
    fn source(&self) -> DateSource {
        DateSource::BodyText
    }

    fn find(&self, ctx: &DateContext<'_>) -> StrategyOutcome {
        let head = ctx.text.lines().take(BODY_SCAN_LINES).join("\n");

        let Some(caps) = BODY_PATTERNS.iter().find_map(|re| re.captures(&head)) else {
            return StrategyOutcome::NoSignal;
        };
        let Some(raw) = caps.name("year").map(|m| m.as_str()) else {
            return StrategyOutcome::Failed("date pattern matched without a year".to_string());
        };

        match raw.parse::<i32>() {
            Ok(year) if ctx.bounds.contains(year) => StrategyOutcome::Found(year),
            Ok(year) => {
                debug!(year, "Written date outside year bounds");
                StrategyOutcome::NoSignal
            }
            Err(e) => StrategyOutcome::Failed(format!("bad year {raw:?} in body text: {e}")),
        }
    }
}

/// An ordered list of [`DateStrategy`] units.
pub struct DateChain {
    strategies: Vec<Box<dyn DateStrategy + Send + Sync>>,
}

impl DateChain {
    pub fn new(strategies: Vec<Box<dyn DateStrategy + Send + Sync>>) -> Self {
        Self { strategies }
    }

    /// The standard chain; the body-text scan is appended when `body_text` is set.
    pub fn standard(body_text: bool) -> Self {
        let mut strategies: Vec<Box<dyn DateStrategy + Send + Sync>> = vec![
            Box::new(PublishDateStrategy),
            Box::new(MetaTagStrategy),
            Box::new(UrlPathStrategy),
        ];
        if body_text {
            strategies.push(Box::new(BodyTextStrategy));
        }
        Self::new(strategies)
    }

    /// Run the strategies in order and return the first in-bounds year.
    #[instrument(level = "info", skip_all, fields(url = %ctx.url))]
    pub fn resolve(&self, ctx: &DateContext<'_>) -> Option<DateCandidate> {
        for strategy in &self.strategies {
            let source = strategy.source();
            match strategy.find(ctx) {
                StrategyOutcome::Found(year) if ctx.bounds.contains(year) => {
                    info!(%source, year, "Resolved publication year");
                    return Some(DateCandidate { year, source });
                }
                StrategyOutcome::Found(year) => {
                    warn!(%source, year, min = ctx.bounds.min, max = ctx.bounds.max, "Year outside bounds; ignoring");
                }
                StrategyOutcome::NoSignal => debug!(%source, "No date signal"),
                StrategyOutcome::Failed(reason) => {
                    warn!(%source, %reason, "Date strategy failed; continuing");
                }
            }
        }
        info!("No publication year found");
        None
    }
}

impl std::fmt::Debug for DateChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateChain")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.source()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
