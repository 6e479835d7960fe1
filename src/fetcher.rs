//! Feed fetching and per-entry record assembly.
//!
//! Sources are processed one at a time in registry order. A source that
//! fails to download or parse is logged and skipped; the rest of the cycle
//! carries on.

use crate::abstracts::AbstractScraper;
use crate::article::Article;
use crate::doi::{extract_doi, EntryIdentifiers};
use crate::error::{JournalError, Result};
use crate::feed_xml::{match_identifiers, scan_entry_identifiers};
use crate::registry::FeedSource;
use crate::text::clean_feed_text;
use crate::topics::assign_topics;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default lookback window in days
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;

/// Feed request timeout
pub const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent for feed requests
const FEED_USER_AGENT: &str = "Mozilla/5.0 (compatible; rustjournals/0.1; journal feed reader)";

/// Title used when an entry has none
const UNTITLED: &str = "Untitled";

/// One feed entry with its publish timestamp, before abstract resolution
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
    /// Plain-text summary from the feed, if any
    pub feed_abstract: Option<String>,
    pub identifiers: EntryIdentifiers,
}

/// Start of the lookback window.
///
/// Negative lookbacks and windows reaching past the representable date
/// range are rejected.
pub fn cutoff_for(now: DateTime<Utc>, lookback_days: i64) -> Result<DateTime<Utc>> {
    if lookback_days < 0 {
        return Err(JournalError::Validation(format!(
            "Lookback must not be negative, got {} days",
            lookback_days
        )));
    }

    ChronoDuration::try_days(lookback_days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| {
            JournalError::Validation(format!("Lookback of {} days is out of range", lookback_days))
        })
}

/// Inclusive window check: an entry published exactly at the cutoff is kept.
pub fn is_within_window(published: DateTime<Utc>, cutoff: DateTime<Utc>) -> bool {
    published >= cutoff
}

/// Parse a feed document into entries that carry a publish timestamp.
///
/// Entries without a timestamp or without any link/id are dropped here.
pub fn parse_feed_entries(xml: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = feed_rs::parser::parse(xml)
        .map_err(|e| JournalError::Feed(format!("Failed to parse feed: {}", e)))?;

    let scanned = scan_entry_identifiers(xml).unwrap_or_else(|e| {
        debug!(error = %e, "Identifier scan failed, relying on links only");
        Vec::new()
    });

    let entry_count = feed.entries.len();
    let mut entries = Vec::with_capacity(entry_count);

    for (index, entry) in feed.entries.into_iter().enumerate() {
        let Some(published) = entry.published.or(entry.updated) else {
            debug!(id = %entry.id, "Skipping entry without publish date");
            continue;
        };

        let link = entry
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| entry.links.first())
            .map(|l| l.href.trim().to_string())
            .filter(|href| !href.is_empty())
            .unwrap_or_else(|| entry.id.trim().to_string());
        if link.is_empty() {
            debug!("Skipping entry without link or id");
            continue;
        }

        let title = entry
            .title
            .map(|t| clean_feed_text(&t.content))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let feed_abstract = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .map(|raw| clean_feed_text(&raw))
            .filter(|s| !s.is_empty());

        let scanned_ids = match_identifiers(&scanned, entry_count, index, &link);
        let identifiers = EntryIdentifiers {
            prism_doi: scanned_ids.and_then(|s| s.prism_doi.clone()),
            dc_identifier: scanned_ids.and_then(|s| s.dc_identifier.clone()),
            link: link.clone(),
            id: entry.id,
        };

        entries.push(FeedEntry {
            title,
            link,
            published,
            feed_abstract,
            identifiers,
        });
    }

    Ok(entries)
}

/// Downloads feeds and turns their recent entries into articles.
pub struct FeedFetcher {
    client: reqwest::Client,
    scraper: AbstractScraper,
}

impl FeedFetcher {
    /// Create a fetcher with default timeouts
    pub fn new() -> Result<Self> {
        Self::with_scraper(AbstractScraper::new()?)
    }

    /// Create a fetcher around an existing abstract scraper
    pub fn with_scraper(scraper: AbstractScraper) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(FEED_USER_AGENT)
            .timeout(FEED_TIMEOUT)
            .build()
            .map_err(|e| JournalError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, scraper })
    }

    /// Fetch every source and collect articles published on or after `cutoff`.
    ///
    /// Output follows registry order, then entry order within each feed.
    pub async fn fetch_recent_articles(
        &self,
        sources: &[FeedSource],
        cutoff: DateTime<Utc>,
    ) -> Vec<Article> {
        info!(
            sources = sources.len(),
            cutoff = %cutoff.format("%Y-%m-%d"),
            "Starting feed fetch"
        );

        let mut articles = Vec::new();
        let mut failed = 0usize;

        for source in sources {
            match self.fetch_source(source, cutoff).await {
                Ok(found) => {
                    info!(journal = %source.name, count = found.len(), "Feed processed");
                    articles.extend(found);
                }
                Err(e) => {
                    failed += 1;
                    error!(journal = %source.name, error = %e, "Feed fetch failed");
                    println!("Error fetching {}: {}", source.name, e);
                }
            }
        }

        info!(
            total = articles.len(),
            failed_sources = failed,
            "Feed fetch complete"
        );
        articles
    }

    /// Fetch one source.
    pub async fn fetch_source(&self, source: &FeedSource, cutoff: DateTime<Utc>) -> Result<Vec<Article>> {
        let body = self.download(&source.url).await?;
        let entries = parse_feed_entries(&body)?;

        let mut articles = Vec::new();
        for entry in entries {
            if !is_within_window(entry.published, cutoff) {
                continue;
            }
            articles.push(self.build_article(&source.name, entry).await);
        }
        Ok(articles)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url = url, "Downloading feed");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = url, status = status.as_u16(), "Feed request rejected");
            return Err(JournalError::Api {
                code: status.as_u16() as i32,
                message: format!("HTTP error: {}", status),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Resolve abstract, DOI and topics for one in-window entry.
    pub async fn build_article(&self, journal: &str, entry: FeedEntry) -> Article {
        let doi = extract_doi(&entry.identifiers);
        let abstract_text = self
            .scraper
            .resolve(entry.feed_abstract.as_deref(), &entry.link, &entry.title)
            .await;
        let topics = assign_topics(&entry.title, &abstract_text)
            .into_iter()
            .map(str::to_string)
            .collect();

        Article {
            journal: journal.to_string(),
            title: entry.title,
            link: entry.link,
            published_date: entry.published.date_naive(),
            abstract_text,
            topics,
            doi,
        }
    }
}
