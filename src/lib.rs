//! # Article Dating
//!
//! Extracts the body text and publication year of a news article from its
//! URL, even when the page uses pre-semantic table markup or carries no
//! structured date.
//!
//! ## Architecture
//!
//! 1. **Fetching**: one request with a browser user agent ([`fetch`])
//! 2. **Parsing**: generic boilerplate removal ([`parser`])
//! 3. **Text recovery**: legacy-site selectors, then a paragraph sweep ([`recovery::text`])
//! 4. **Date recovery**: structured date, meta tags, URL path, body text ([`recovery::date`])
//!
//! [`pipeline::Extractor`] sequences the stages and maps failures onto
//! [`error::ExtractError`].
//!
//! ```no_run
//! use article_dating::pipeline::{Extractor, ExtractorConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::from_config(&ExtractorConfig::default())?;
//! let result = extractor.extract("https://example.com/2019/story").await?;
//! println!("{:?} {}", result.year, result.text);
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod fetch;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod recovery;
pub mod scrapers;
pub mod utils;

pub use error::{ExtractError, FetchError};
pub use models::{ExtractionRequest, ExtractionResult};
pub use pipeline::{Extractor, ExtractorConfig};
