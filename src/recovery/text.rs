//! Text-Recovery Chain.
//!
//! Runs only when the boilerplate parser yielded empty or whitespace-only
//! text. Strategies are tried in order:
//!
//! 1. [`LegacySiteStrategy`]: selectors registered for the URL's host in
//!    [`crate::scrapers::REGISTRY`]
//! 2. [`ParagraphStrategy`]: every paragraph of the page once page furniture
//!    has been stripped
//!
//! An empty outcome is returned as `None`; turning that into a failure is the
//! orchestrator's job.

use crate::document::{strip_elements, visible_text};
use crate::scrapers::{self, LegacySite};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Fragments from a legacy selector must be longer than this many characters.
pub const LEGACY_MIN_CHARS: usize = 100;

/// Paragraphs from the generic fallback must be longer than this many characters.
pub const PARAGRAPH_MIN_CHARS: usize = 50;

/// Elements removed before the generic paragraph sweep.
const NON_CONTENT: [&str; 5] = ["script", "style", "nav", "header", "footer"];

const FRAGMENT_SEPARATOR: &str = "\n\n";

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));

/// One independent attempt at recovering body text.
pub trait TextStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Recover text from `tree`, or `None` when this strategy finds nothing.
    fn recover(&self, tree: &Html, url: &Url) -> Option<String>;
}

/// Tries the selectors of a registered legacy site, one selector at a time.
///
/// The first selector producing any fragment longer than
/// [`LEGACY_MIN_CHARS`] wins, and only its fragments are returned.
#[derive(Debug, Clone, Copy)]
pub struct LegacySiteStrategy {
    registry: &'static [LegacySite],
}

impl LegacySiteStrategy {
    pub fn new(registry: &'static [LegacySite]) -> Self {
        Self { registry }
    }

    fn site_for(&self, url: &Url) -> Option<&'static LegacySite> {
        scrapers::lookup(self.registry, url.host_str()?)
    }
}

impl Default for LegacySiteStrategy {
    fn default() -> Self {
        Self::new(scrapers::REGISTRY)
    }
}

impl TextStrategy for LegacySiteStrategy {
    fn name(&self) -> &'static str {
        "legacy_site"
    }

    fn recover(&self, tree: &Html, url: &Url) -> Option<String> {
        let site = self.site_for(url)?;
        debug!(site = site.name, "Trying legacy layout selectors");

        for raw in site.selectors {
            let selector = match Selector::parse(raw) {
                Ok(selector) => selector,
                Err(e) => {
                    warn!(site = site.name, selector = raw, error = %e, "Skipping invalid legacy selector");
                    continue;
                }
            };

            let fragments: Vec<String> = tree
                .select(&selector)
                .map(visible_text)
                .filter(|t| t.chars().count() > LEGACY_MIN_CHARS)
                .collect();

            if !fragments.is_empty() {
                info!(site = site.name, selector = raw, fragments = fragments.len(), "Legacy selector matched");
                return Some(fragments.join(FRAGMENT_SEPARATOR));
            }
        }
        None
    }
}

/// Collects every paragraph of the page after removing non-content elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphStrategy;

impl TextStrategy for ParagraphStrategy {
    fn name(&self) -> &'static str {
        "paragraphs"
    }

    fn recover(&self, tree: &Html, _url: &Url) -> Option<String> {
        let cleaned = strip_elements(tree, &NON_CONTENT);
        let text = cleaned
            .select(&PARAGRAPH)
            .map(visible_text)
            .filter(|t| t.chars().count() > PARAGRAPH_MIN_CHARS)
            .join(FRAGMENT_SEPARATOR);
        (!text.is_empty()).then_some(text)
    }
}

/// An ordered list of [`TextStrategy`] units.
pub struct TextChain {
    strategies: Vec<Box<dyn TextStrategy + Send + Sync>>,
}

impl TextChain {
    pub fn new(strategies: Vec<Box<dyn TextStrategy + Send + Sync>>) -> Self {
        Self { strategies }
    }

    /// Legacy site selectors first, then the generic paragraph sweep.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(LegacySiteStrategy::default()),
            Box::new(ParagraphStrategy),
        ])
    }

    /// Run the strategies in order and return the first non-blank text.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub fn recover(&self, tree: &Html, url: &Url) -> Option<String> {
        for strategy in &self.strategies {
            match strategy.recover(tree, url) {
                Some(text) if !text.trim().is_empty() => {
                    info!(strategy = strategy.name(), chars = text.chars().count(), "Recovered text");
                    return Some(text);
                }
                _ => debug!(strategy = strategy.name(), "No text from strategy"),
            }
        }
        warn!("Text recovery exhausted");
        None
    }
}

impl std::fmt::Debug for TextChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextChain")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(n: usize) -> String {
        "Lorem ipsum dolor sit amet. ".repeat(n).trim().to_string()
    }

    fn cnn_url() -> Url {
        Url::parse("http://www.cnn.com/2003/WORLD/meast/03/20/story/").unwrap()
    }

    #[test]
    fn test_legacy_width_cell_wins_alone() {
        let body = para(11); // ~300 characters
        assert!(body.chars().count() > 290);
        let html = Html::parse_document(&format!(
            r#"<html><body><table><tr>
                <td width="30%">Navigation and other links</td>
                <td width="70%"><p>{body}</p></td>
            </tr></table>
            <p class="cnn_storypgraphtxt">{}</p>
            </body></html>"#,
            para(8)
        ));

        let text = TextChain::standard().recover(&html, &cnn_url()).unwrap();
        assert_eq!(text, body);
    }

    #[test]
    fn test_legacy_selectors_tried_in_priority_order() {
        let first = para(5);
        let html = Html::parse_document(&format!(
            r#"<html><body><table><tr>
                <td class="cnnBodyText">{first}</td>
                <td width="70%">{}</td>
            </tr></table></body></html>"#,
            para(6)
        ));

        let text = LegacySiteStrategy::default().recover(&html, &cnn_url()).unwrap();
        assert_eq!(text, first);
    }

    #[test]
    fn test_legacy_fragments_joined_and_short_ones_dropped() {
        let a = para(4);
        let b = para(5);
        let html = Html::parse_document(&format!(
            r#"<html><body>
                <p class="cnn_storypgraphtxt">{a}</p>
                <p class="cnn_storypgraphtxt">Too short.</p>
                <p class="cnn_storypgraphtxt">{b}</p>
            </body></html>"#
        ));

        let text = LegacySiteStrategy::default().recover(&html, &cnn_url()).unwrap();
        assert_eq!(text, format!("{a}\n\n{b}"));
    }

    #[test]
    fn test_legacy_strategy_ignores_other_hosts() {
        let html = Html::parse_document(&format!(
            r#"<html><body><td class="cnnBodyText">{}</td></body></html>"#,
            para(6)
        ));
        let url = Url::parse("https://example.com/story").unwrap();
        assert!(LegacySiteStrategy::default().recover(&html, &url).is_none());
    }

    #[test]
    fn test_legacy_miss_falls_back_to_paragraphs() {
        let body = para(3);
        let html = Html::parse_document(&format!(
            r#"<html><body><div><p>{body}</p></div></body></html>"#
        ));

        let text = TextChain::standard().recover(&html, &cnn_url()).unwrap();
        assert_eq!(text, body);
    }

    #[test]
    fn test_paragraphs_strip_furniture_and_short_text() {
        let body = para(3);
        let html = Html::parse_document(&format!(
            r#"<html><body>
                <header><p>{}</p></header>
                <nav><p>{}</p></nav>
                <div><p>{body}</p><p>Short paragraph.</p></div>
                <footer><p>{}</p></footer>
            </body></html>"#,
            para(3),
            para(3),
            para(3)
        ));
        let url = Url::parse("https://example.com/story").unwrap();

        let text = ParagraphStrategy.recover(&html, &url).unwrap();
        assert_eq!(text, body);
    }

    #[test]
    fn test_exhausted_chain_returns_none() {
        let html = Html::parse_document("<html><body><p>Nothing here.</p></body></html>");
        let url = Url::parse("https://example.com/story").unwrap();
        assert!(TextChain::standard().recover(&html, &url).is_none());
    }
}
