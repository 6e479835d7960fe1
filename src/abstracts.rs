//! Abstract resolution with a page-scraping fallback.
//!
//! Many publisher feeds ship a citation stub ("Volume 79, Issue 1") or a
//! truncated teaser instead of the abstract. When the feed text looks like
//! that, the article page is fetched and searched with a ranked list of
//! HTML heuristics. Scraping never fails the caller: every problem ends up
//! as `None` and the placeholder text is stored instead.

use crate::error::{JournalError, Result};
use crate::text::{normalize_ws, preview};
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// Browser user agent sent with article page requests
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Page request timeout
pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(10);

/// Stand-in used when the feed has no abstract at all
pub const NO_ABSTRACT: &str = "No abstract available";

/// Stored when neither the feed nor the article page yields an abstract
pub const SCRAPE_FAILED_PLACEHOLDER: &str =
    "Abstract could not be scraped. Please visit the article link.";

/// Feed abstracts shorter than this are re-scraped
pub const MIN_FEED_ABSTRACT_CHARS: usize = 200;

/// Meta tag contents must be longer than this to count
pub const MIN_META_ABSTRACT_CHARS: usize = 100;

/// Substrings that mark a citation stub rather than an abstract
const STUB_MARKERS: &[&str] = &["Volume", "Issue", "EarlyView"];

/// Elements searched for an `abstract`-classed container
const CONTAINER_TAGS: &str = "div, section, p";

/// Whether a feed-supplied abstract should be replaced by a scraped one.
pub fn is_insufficient(text: &str) -> bool {
    text.chars().count() < MIN_FEED_ABSTRACT_CHARS
        || STUB_MARKERS.iter().any(|marker| text.contains(marker))
        || text == NO_ABSTRACT
}

/// One heuristic for locating an abstract in an article page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbstractRule {
    /// `content` of the first meta tag matching the selector, length gated
    Meta(&'static str),
    /// Text of the first container whose class mentions "abstract"
    AbstractContainer,
}

/// Heuristics in priority order.
pub const ABSTRACT_RULES: &[AbstractRule] = &[
    AbstractRule::Meta(r#"meta[name="citation_abstract"]"#),
    AbstractRule::Meta(r#"meta[name="dc.description"]"#),
    AbstractRule::Meta(r#"meta[property="og:description"]"#),
    AbstractRule::Meta(r#"meta[name="description"]"#),
    AbstractRule::AbstractContainer,
];

impl AbstractRule {
    /// Run this heuristic against a parsed page.
    pub fn apply(&self, document: &Html) -> Option<String> {
        match self {
            AbstractRule::Meta(selector) => {
                let selector = Selector::parse(selector).ok()?;
                let content = document
                    .select(&selector)
                    .next()?
                    .value()
                    .attr("content")?
                    .trim();
                (content.chars().count() > MIN_META_ABSTRACT_CHARS).then(|| content.to_string())
            }
            AbstractRule::AbstractContainer => {
                let selector = Selector::parse(CONTAINER_TAGS).ok()?;
                let container = document.select(&selector).find(has_abstract_class)?;
                let text = normalize_ws(&container.text().collect::<Vec<_>>().join(" "));
                (!text.is_empty()).then_some(text)
            }
        }
    }
}

fn has_abstract_class(element: &ElementRef) -> bool {
    element
        .value()
        .classes()
        .any(|class| class.to_lowercase().contains("abstract"))
}

/// Search an article page for its abstract.
pub fn extract_abstract(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    ABSTRACT_RULES.iter().find_map(|rule| rule.apply(&document))
}

/// HTTP client for article pages.
pub struct AbstractScraper {
    client: reqwest::Client,
}

impl AbstractScraper {
    /// Create a scraper with the default 10 second timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(SCRAPE_TIMEOUT)
    }

    /// Create a scraper with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| JournalError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch an article page and pull its abstract out.
    ///
    /// Returns `None` on network errors, timeouts, non-200 responses, or
    /// when no heuristic matches.
    pub async fn fetch_full_abstract(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(found) => found,
            Err(e) => {
                debug!(url = url, error = %e, "Abstract scrape failed");
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(url = url, status = status.as_u16(), "Article page not available");
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(extract_abstract(&body))
    }

    /// Pick the abstract to store for an entry.
    ///
    /// A usable feed abstract is kept as-is; otherwise the article page is
    /// scraped, and [`SCRAPE_FAILED_PLACEHOLDER`] is used if that fails too.
    pub async fn resolve(&self, feed_abstract: Option<&str>, link: &str, title: &str) -> String {
        let feed_abstract = feed_abstract.unwrap_or(NO_ABSTRACT);
        if !is_insufficient(feed_abstract) {
            return feed_abstract.to_string();
        }

        info!(title = %preview(title, 50), "Scraping missing abstract");
        match self.fetch_full_abstract(link).await {
            Some(scraped) => scraped,
            None => SCRAPE_FAILED_PLACEHOLDER.to_string(),
        }
    }
}
