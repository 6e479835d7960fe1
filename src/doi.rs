//! Best-effort DOI extraction from feed entries.
//!
//! Publishers expose DOIs inconsistently: some send `prism:doi`, some a
//! `dc:identifier`, and many only embed the DOI in the article URL. The
//! rules below are tried in order and the first hit wins.

use regex::Regex;

/// Sentinel stored when no DOI could be found
pub const DOI_NOT_FOUND: &str = "DOI Not Found";

/// DOI shape searched for in links and ids
const DOI_PATTERN: &str = r"10\.\d{4,9}/[-._;()/:a-zA-Z0-9]+";

/// Identifier fields of a single feed entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryIdentifiers {
    /// `prism:doi` element
    pub prism_doi: Option<String>,
    /// `dc:identifier` element
    pub dc_identifier: Option<String>,
    /// Entry link
    pub link: String,
    /// Entry id / guid
    pub id: String,
}

/// A single extraction rule.
pub type DoiRule = fn(&EntryIdentifiers) -> Option<String>;

/// Extraction rules in priority order.
pub const DOI_RULES: &[(&str, DoiRule)] = &[
    ("prism_doi", from_prism_doi),
    ("dc_identifier", from_dc_identifier),
    ("link_pattern", from_link_pattern),
];

/// Resolve the DOI for an entry, or [`DOI_NOT_FOUND`].
pub fn extract_doi(ids: &EntryIdentifiers) -> String {
    DOI_RULES
        .iter()
        .find_map(|(_, rule)| rule(ids))
        .unwrap_or_else(|| DOI_NOT_FOUND.to_string())
}

/// Dedicated DOI metadata, returned as published.
pub fn from_prism_doi(ids: &EntryIdentifiers) -> Option<String> {
    ids.prism_doi
        .as_deref()
        .map(str::trim)
        .filter(|doi| !doi.is_empty())
        .map(str::to_string)
}

/// Dublin Core identifier that looks like a DOI, minus its URI prefix.
pub fn from_dc_identifier(ids: &EntryIdentifiers) -> Option<String> {
    let identifier = ids.dc_identifier.as_deref()?.trim();
    if !identifier.contains("10.") {
        return None;
    }
    Some(identifier.replace("urn:doi:", "").replace("doi:", ""))
}

/// First DOI-shaped substring of the link or id.
pub fn from_link_pattern(ids: &EntryIdentifiers) -> Option<String> {
    let re = Regex::new(DOI_PATTERN).ok()?;
    let haystack = format!("{} {}", ids.link, ids.id);
    re.find(&haystack)
        .map(|m| m.as_str().trim_end_matches('/').to_string())
        .filter(|doi| !doi.is_empty())
}

/// Whether a stored DOI is a real value rather than the sentinel.
pub fn is_resolved(doi: &str) -> bool {
    !doi.trim().is_empty() && doi != DOI_NOT_FOUND
}
