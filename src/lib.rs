//! # rustjournals
//!
//! Journal RSS aggregator: pulls recent articles from academic feeds,
//! fills in missing abstracts by scraping article pages, tags topics, and
//! keeps a deduplicated CSV archive.
//!
//! ## Modules
//!
//! - [`registry`] - Journal feed list
//! - [`fetcher`] - Feed download, date window and record assembly
//! - [`feed_xml`] - Namespaced identifier scan (`prism:doi`, `dc:identifier`)
//! - [`doi`] - DOI extraction rules
//! - [`abstracts`] - Abstract sufficiency check and page-scrape fallback
//! - [`topics`] - Keyword topic tagging
//! - [`archive`] - CSV archive load/merge/write
//! - [`view`] - Filtering and sorting over the archive
//! - [`summarize`] - LLM summaries of a result set
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustjournals::{archive::Archive, fetcher, registry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cutoff = fetcher::cutoff_for(chrono::Utc::now(), fetcher::DEFAULT_LOOKBACK_DAYS)?;
//!     let articles = fetcher::FeedFetcher::new()?
//!         .fetch_recent_articles(&registry::default_registry(), cutoff)
//!         .await;
//!     if let Some(total) = Archive::new("io_psych_articles.csv").merge(articles)? {
//!         println!("Archive now holds {} articles", total);
//!     }
//!     Ok(())
//! }
//! ```

pub mod abstracts;
pub mod archive;
pub mod article;
pub mod doi;
pub mod error;
pub mod feed_xml;
pub mod fetcher;
pub mod prompts;
pub mod registry;
pub mod summarize;
pub mod text;
pub mod topics;
pub mod view;

pub use article::Article;
pub use error::{JournalError, Result};
