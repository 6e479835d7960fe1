//! Journal feed registry.
//!
//! The built-in registry covers the I/O psychology and management journals
//! the archive was started with. A different list can be supplied as a JSON
//! array of `{ "name": ..., "url": ... }` objects.

use crate::error::{JournalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;
use url::Url;

/// A named journal feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Journal name stored in the archive
    pub name: String,
    /// RSS/Atom feed URL
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

const JOURNAL_FEEDS: &[(&str, &str)] = &[
    ("Journal of Applied Psychology", "https://content.apa.org/journals/apl.rss"),
    ("Journal of Occupational Health Psychology", "https://content.apa.org/journals/ocp.rss"),
    ("Consulting Psychology Journal", "https://content.apa.org/journals/cpb.rss"),
    ("Academy of Management Journal", "https://journals.aom.org/action/showFeed?type=etoc&feed=rss&jc=amj"),
    ("Academy of Management Review", "https://journals.aom.org/action/showFeed?type=etoc&feed=rss&jc=amr"),
    ("Journal of Organizational Behavior", "https://onlinelibrary.wiley.com/feed/10991379/most-recent"),
    ("Personnel Psychology", "https://onlinelibrary.wiley.com/feed/17446570/most-recent"),
    ("Journal of Occupational and Organizational Psychology", "https://onlinelibrary.wiley.com/feed/20448325/most-recent"),
    ("Human Resource Development Quarterly", "https://onlinelibrary.wiley.com/feed/15321096/most-recent"),
    ("Human Resource Management", "https://onlinelibrary.wiley.com/feed/1099050X/most-recent"),
    ("International Journal of Selection and Assessment", "https://onlinelibrary.wiley.com/feed/14682389/most-recent"),
    ("Journal of Management", "https://journals.sagepub.com/action/showFeed?type=etoc&feed=rss&jc=joma"),
    ("Administrative Science Quarterly", "https://journals.sagepub.com/action/showFeed?type=etoc&feed=rss&jc=asqa"),
    ("Australian Journal of Management", "https://journals.sagepub.com/action/showFeed?type=etoc&feed=rss&jc=auma"),
    ("Group & Organization Management", "https://journals.sagepub.com/action/showFeed?type=etoc&feed=rss&jc=goma"),
    ("Organizational Psychology Review", "https://journals.sagepub.com/action/showFeed?type=etoc&feed=rss&jc=opra"),
    ("Organizational Behavior and Human Decision Processes (OBHDP)", "https://rss.sciencedirect.com/publication/science/07495978"),
    ("The Leadership Quarterly", "https://rss.sciencedirect.com/publication/science/10489843"),
    ("Journal of Vocational Behavior", "https://rss.sciencedirect.com/publication/science/00018791"),
    ("European Journal of Work and Organizational Psychology", "https://www.tandfonline.com/action/showFeed?type=etoc&feed=rss&jc=pewo20"),
    ("Human Performance", "https://www.tandfonline.com/action/showFeed?type=etoc&feed=rss&jc=hhup20"),
    ("Work & Stress", "https://www.tandfonline.com/action/showFeed?type=etoc&feed=rss&jc=twst20"),
    ("Journal of Business and Psychology", "https://link.springer.com/search.rss?facet-journal-id=10869&channel-name=Journal%20of%20Business%20and%20Psychology"),
    ("Organization Science", "https://pubsonline.informs.org/action/showFeed?type=etoc&feed=rss&jc=orsc"),
    ("Journal of Managerial Psychology", "https://www.emerald.com/insight/publication/issn/0268-3946/rss"),
    ("Industrial and Organizational Psychology", "https://www.cambridge.org/core/rss/product/id/IOP"),
    ("Journal of Personnel Psychology", "https://econtent.hogrefe.com/action/showFeed?type=etoc&feed=rss&jc=jpp"),
];

/// Built-in registry, in fetch order
pub fn default_registry() -> Vec<FeedSource> {
    JOURNAL_FEEDS
        .iter()
        .map(|(name, url)| FeedSource::new(*name, *url))
        .collect()
}

/// Reject blank names, duplicate names and unparseable URLs.
pub fn validate_registry(sources: &[FeedSource]) -> Result<()> {
    let mut seen = HashSet::new();
    for source in sources {
        let name = source.name.trim();
        if name.is_empty() {
            return Err(JournalError::Validation(format!(
                "Feed with URL '{}' has no journal name",
                source.url
            )));
        }
        if !seen.insert(name) {
            return Err(JournalError::Validation(format!(
                "Journal '{}' is listed more than once",
                name
            )));
        }
        Url::parse(&source.url).map_err(|e| {
            JournalError::Config(format!("Invalid feed URL '{}' for {}: {}", source.url, name, e))
        })?;
    }
    Ok(())
}

/// Load a registry from a JSON file.
pub fn load_registry(path: &Path) -> Result<Vec<FeedSource>> {
    let content = std::fs::read_to_string(path)?;
    let sources: Vec<FeedSource> = serde_json::from_str(&content)?;
    validate_registry(&sources)?;
    info!(path = %path.display(), count = sources.len(), "Loaded feed registry");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_registry_is_valid() -> Result<()> {
        let registry = default_registry();
        assert_eq!(registry.len(), 27);
        assert_eq!(registry[0].name, "Journal of Applied Psychology");
        validate_registry(&registry)
    }

    #[test]
    fn test_load_registry_from_json() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"name": "Work & Stress", "url": "https://example.com/ws.rss"}}]"#
        )?;
        let registry = load_registry(file.path())?;
        assert_eq!(registry, vec![FeedSource::new("Work & Stress", "https://example.com/ws.rss")]);
        Ok(())
    }

    #[test]
    fn test_duplicate_and_invalid_entries_rejected() {
        let duplicate = vec![
            FeedSource::new("A", "https://example.com/a"),
            FeedSource::new("A", "https://example.com/b"),
        ];
        assert!(matches!(
            validate_registry(&duplicate),
            Err(JournalError::Validation(_))
        ));

        let bad_url = vec![FeedSource::new("A", "not a url")];
        assert!(matches!(validate_registry(&bad_url), Err(JournalError::Config(_))));
    }
}
