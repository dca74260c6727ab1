//! The extraction pipeline.
//!
//! [`Extractor::extract`] runs one request end to end:
//!
//! 1. **Validation**: the URL must be `scheme://host/...`
//! 2. **Fetching**: the only await point; failures surface as `FetchFailed`
//! 3. **Parsing**: generic boilerplate removal, then the text-recovery chain
//!    if that came back blank
//! 4. **Dating**: the date-recovery chain, which never fails the request
//!
//! Each call owns its document outright. An extractor holds no mutable state,
//! so one instance can serve any number of concurrent requests.

use crate::document::Document;
use crate::error::{ExtractError, FetchError};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::models::{ExtractionRequest, ExtractionResult};
use crate::parser::{BoilerplateParser, ContentParser};
use crate::recovery::date::{DateChain, DateContext, YearBounds};
use crate::recovery::text::TextChain;
use crate::utils::truncate_for_log;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Default fetch timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Runtime options for an [`Extractor`].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Upper bound on a single document fetch.
    pub timeout: Duration,
    /// Whether the date chain scans the body text as a last resort.
    pub body_text_dates: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            body_text_dates: true,
        }
    }
}

/// Check that `raw` is an absolute `scheme://host/...` URL.
///
/// The WHATWG parser repairs `http:example.com` into `http://example.com/`;
/// that shape is rejected here instead of being silently fixed.
pub fn validate_url(raw: &str) -> Result<Url, ExtractError> {
    let invalid = |reason: String| ExtractError::InvalidInput {
        url: raw.to_string(),
        reason,
    };

    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    let has_authority = trimmed
        .split_once(':')
        .is_some_and(|(_, rest)| rest.starts_with("//"));
    if !has_authority {
        return Err(invalid("missing //host after scheme".to_string()));
    }
    if url.scheme().is_empty() {
        return Err(invalid("missing scheme".to_string()));
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid("missing host".to_string())),
    }
}

/// Orchestrates fetch, parse, text recovery and date recovery for one URL.
#[derive(Debug)]
pub struct Extractor<F, P> {
    fetcher: F,
    parser: P,
    text_chain: TextChain,
    date_chain: DateChain,
}

impl Extractor<HttpFetcher, ContentParser> {
    /// Build an extractor backed by HTTP and the default boilerplate parser.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config.timeout)?;
        Ok(Self::new(fetcher, ContentParser, config))
    }
}

impl<F, P> Extractor<F, P>
where
    F: Fetcher,
    P: BoilerplateParser,
{
    pub fn new(fetcher: F, parser: P, config: &ExtractorConfig) -> Self {
        Self {
            fetcher,
            parser,
            text_chain: TextChain::standard(),
            date_chain: DateChain::standard(config.body_text_dates),
        }
    }

    /// Extract the body text and publication year of the article at `url`.
    #[instrument(level = "info", skip(self))]
    pub async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractError> {
        let t0 = Instant::now();
        let parsed_url = validate_url(url)?;

        let raw = self.fetcher.fetch(&parsed_url).await.map_err(|source| {
            warn!(error = %source, "Fetch failed");
            ExtractError::FetchFailed {
                url: parsed_url.to_string(),
                source,
            }
        })?;

        let result = self.process(raw, &parsed_url)?;
        info!(
            chars = result.text.chars().count(),
            year = ?result.year,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Extraction complete"
        );
        Ok(result)
    }

    /// Run a decoded [`ExtractionRequest`].
    pub async fn extract_request(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractError> {
        self.extract(&request.url).await
    }

    /// Everything after the fetch. Synchronous, so the parsed tree never
    /// lives across an await point.
    fn process(&self, raw: String, url: &Url) -> Result<ExtractionResult, ExtractError> {
        let document = Document::parse(raw);
        let parsed = self.parser.parse(&document);

        let text = if parsed.text.trim().is_empty() {
            debug!("Boilerplate parser found no text; running recovery chain");
            self.text_chain
                .recover(&document.tree, url)
                .ok_or_else(|| ExtractError::NoContent {
                    url: url.to_string(),
                })?
        } else {
            parsed.text
        };
        debug!(preview = %truncate_for_log(&text, 120), "Article text");

        let ctx = DateContext {
            publish_date: parsed.publish_date,
            meta: &document.meta,
            url,
            text: &text,
            bounds: YearBounds::for_today(),
        };
        let year = self.date_chain.resolve(&ctx).map(|candidate| candidate.year);

        Ok(ExtractionResult { text, year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedArticle;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BODY: &str = "Officials confirmed on Monday that the bridge will reopen to traffic next spring after repairs.";

    /// Serves canned markup and counts how often it was asked.
    struct StaticFetcher {
        html: String,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(html: impl Into<String>) -> Self {
            Self {
                html: html.into(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.clone())
        }
    }

    struct TimeoutFetcher;

    impl Fetcher for TimeoutFetcher {
        async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
            Err(FetchError::Timeout(Duration::from_secs(15)))
        }
    }

    /// A parser that never finds anything, like one facing table markup.
    struct BlankParser;

    impl BoilerplateParser for BlankParser {
        fn parse(&self, _document: &Document) -> ParsedArticle {
            ParsedArticle {
                text: "  \n ".to_string(),
                publish_date: None,
            }
        }
    }

    fn extractor<F: Fetcher>(fetcher: F) -> Extractor<F, ContentParser> {
        Extractor::new(fetcher, ContentParser, &ExtractorConfig::default())
    }

    fn article_page(head: &str) -> String {
        format!("<html><head>{head}</head><body><article><p>{BODY}</p></article></body></html>")
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/story").is_ok());
        assert!(validate_url("  https://example.com/story ").is_ok());
        assert!(validate_url("HTTP://Example.com/x").is_ok());

        for bad in [
            "",
            "example.com/story",
            "/2019/story",
            "mailto:desk@example.com",
            "file:///tmp/x",
            "http:example.com",
            "https:/example.com/story",
        ] {
            let err = validate_url(bad).unwrap_err();
            assert!(err.is_client_error(), "{bad} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_invalid_input_never_fetches() {
        let ex = extractor(StaticFetcher::new(article_page("")));

        let err = ex.extract("not a url").await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput { .. }));
        assert_eq!(ex.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extract_request_body() {
        let ex = extractor(StaticFetcher::new(article_page("")));
        let request = ExtractionRequest::from_json(r#"{"url": "http://example.com/2019/story"}"#).unwrap();

        let result = ex.extract_request(&request).await.unwrap();
        assert_eq!(result.year, Some(2019));

        let bad = ExtractionRequest {
            url: "http:example.com".to_string(),
        };
        assert!(ex.extract_request(&bad).await.unwrap_err().is_client_error());
        assert_eq!(ex.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_year_from_url_path() {
        let ex = extractor(StaticFetcher::new(article_page("")));

        let result = ex.extract("http://example.com/2019/story").await.unwrap();
        assert_eq!(result.text, BODY);
        assert_eq!(result.year, Some(2019));
    }

    #[tokio::test]
    async fn test_year_from_meta_tag_prefix() {
        let ex = extractor(StaticFetcher::new(article_page(
            r#"<meta name="datePublished" content="2015-03-02xyz">"#,
        )));

        let result = ex.extract("https://example.com/story").await.unwrap();
        assert_eq!(result.year, Some(2015));
    }

    #[tokio::test]
    async fn test_structured_date_outranks_url() {
        let head = r#"<script type="application/ld+json">{"@type":"NewsArticle","datePublished":"2014-02-01T09:00:00Z"}</script>
                      <meta property="article:published_time" content="2016-01-01">"#;
        let ex = extractor(StaticFetcher::new(article_page(head)));

        let result = ex.extract("https://example.com/2019/story").await.unwrap();
        assert_eq!(result.year, Some(2014));
    }

    #[tokio::test]
    async fn test_legacy_cnn_layout() {
        let paragraph = "Coalition forces pressed north on Thursday as commanders described steady progress. "
            .repeat(4)
            .trim()
            .to_string();
        let html = format!(
            r#"<html><body><table><tr>
                <td width="20%">Home | World | U.S. | Weather</td>
                <td width="70%"><p>{paragraph}</p></td>
            </tr></table>
            <p class="cnn_storypgraphtxt">{paragraph} And more.</p></body></html>"#
        );
        let ex = Extractor::new(StaticFetcher::new(html), BlankParser, &ExtractorConfig::default());

        let result = ex.extract("http://www.cnn.com/WORLD/meast/story.html").await.unwrap();
        assert_eq!(result.text, paragraph);
    }

    #[tokio::test]
    async fn test_blank_parse_falls_back_to_paragraphs() {
        let ex = Extractor::new(
            StaticFetcher::new(article_page("")),
            BlankParser,
            &ExtractorConfig::default(),
        );

        let result = ex.extract("https://example.com/story").await.unwrap();
        assert_eq!(result.text, BODY);
        assert_eq!(result.year, None);
    }

    #[tokio::test]
    async fn test_no_content() {
        let ex = extractor(StaticFetcher::new("<html><body><p>Subscribe now.</p></body></html>"));

        let err = ex.extract("https://example.com/2019/story").await.unwrap_err();
        assert!(matches!(err, ExtractError::NoContent { .. }));
        assert_eq!(err.kind(), "no_content");
    }

    #[tokio::test]
    async fn test_timeout_is_fetch_failed() {
        let ex = extractor(TimeoutFetcher);

        let err = ex.extract("https://example.com/2019/story").await.unwrap_err();
        assert!(matches!(
            err,
            ExtractError::FetchFailed {
                source: FetchError::Timeout(_),
                ..
            }
        ));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_extract_is_idempotent() {
        let ex = extractor(StaticFetcher::new(article_page(
            r#"<meta name="pubdate" content="2012/10/29">"#,
        )));

        let first = ex.extract("https://example.com/2019/story").await.unwrap();
        let second = ex.extract("https://example.com/2019/story").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.year, Some(2012));
    }

    #[tokio::test]
    async fn test_body_text_dates_respect_config() {
        let html = format!(
            "<html><body><article><p>WASHINGTON, March 14, 2011. {BODY}</p></article></body></html>"
        );
        let url = "https://example.com/story";

        let with_scan = extractor(StaticFetcher::new(html.clone()));
        assert_eq!(with_scan.extract(url).await.unwrap().year, Some(2011));

        let config = ExtractorConfig {
            body_text_dates: false,
            ..ExtractorConfig::default()
        };
        let without_scan = Extractor::new(StaticFetcher::new(html), ContentParser, &config);
        assert_eq!(without_scan.extract(url).await.unwrap().year, None);
    }
}
