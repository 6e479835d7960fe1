//! Raw XML scan for per-entry identifier elements.
//!
//! feed-rs normalises RSS/Atom into a common model but drops namespaced
//! elements such as `prism:doi` and `dc:identifier`. This pass walks the
//! document once with quick-xml and records those elements for every
//! `<item>`/`<entry>` in document order.

use crate::error::{JournalError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Identifier elements found inside one feed entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScannedIdentifiers {
    /// RSS `<link>` text or Atom `<link href>`
    pub link: Option<String>,
    /// `prism:doi`
    pub prism_doi: Option<String>,
    /// `dc:identifier`
    pub dc_identifier: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Link,
    PrismDoi,
    DcIdentifier,
}

fn field_for(name: &[u8]) -> Option<Field> {
    match name {
        b"link" => Some(Field::Link),
        b"prism:doi" => Some(Field::PrismDoi),
        b"dc:identifier" => Some(Field::DcIdentifier),
        _ => None,
    }
}

fn is_entry(local_name: &[u8]) -> bool {
    local_name == b"item" || local_name == b"entry"
}

/// Atom links carry the URL in `href`; only alternate links count.
fn atom_href(e: &BytesStart) -> Option<String> {
    let mut rel = None;
    let mut href = None;
    for attr in e.attributes().flatten() {
        let value = attr
            .unescape_value()
            .map(|v| v.to_string())
            .unwrap_or_default();
        match attr.key.as_ref() {
            b"rel" => rel = Some(value),
            b"href" => href = Some(value),
            _ => {}
        }
    }
    match rel.as_deref() {
        None | Some("alternate") => href.filter(|h| !h.trim().is_empty()),
        _ => None,
    }
}

fn store(current: &mut ScannedIdentifiers, field: Field, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let slot = match field {
        Field::Link => &mut current.link,
        Field::PrismDoi => &mut current.prism_doi,
        Field::DcIdentifier => &mut current.dc_identifier,
    };
    if slot.is_none() {
        *slot = Some(text.to_string());
    }
}

/// Collect identifier elements for every entry in the document.
pub fn scan_entry_identifiers(xml: &[u8]) -> Result<Vec<ScannedIdentifiers>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut entries = Vec::new();
    let mut current: Option<ScannedIdentifiers> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                if is_entry(e.local_name().as_ref()) {
                    current = Some(ScannedIdentifiers::default());
                } else if let Some(entry) = current.as_mut() {
                    field = field_for(e.name().as_ref());
                    text.clear();
                    if field == Some(Field::Link) {
                        if let Some(href) = atom_href(&e) {
                            store(entry, Field::Link, &href);
                        }
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(entry) = current.as_mut() {
                    if e.name().as_ref() == b"link" {
                        if let Some(href) = atom_href(&e) {
                            store(entry, Field::Link, &href);
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if field.is_some() {
                    text.push_str(&t.unescape().map(|t| t.to_string()).unwrap_or_default());
                }
            }
            Ok(Event::CData(c)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(e)) => {
                if is_entry(e.local_name().as_ref()) {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                    field = None;
                } else if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    if field_for(e.name().as_ref()) == Some(f) {
                        store(entry, f, &text);
                        field = None;
                        text.clear();
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                return Err(JournalError::Parse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    Ok(entries)
}

/// Find the scanned identifiers for the `index`-th parsed entry.
///
/// Positions are trusted when both passes saw the same number of entries;
/// otherwise the entry's link is used as the key.
pub fn match_identifiers<'a>(
    scanned: &'a [ScannedIdentifiers],
    entry_count: usize,
    index: usize,
    link: &str,
) -> Option<&'a ScannedIdentifiers> {
    if scanned.len() == entry_count {
        return scanned.get(index);
    }
    scanned
        .iter()
        .find(|s| s.link.as_deref().map(str::trim) == Some(link))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:prism="http://prismstandard.org/namespaces/basic/2.0/" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Journal</title>
    <link>https://example.com</link>
    <item>
      <title>First</title>
      <link>https://example.com/a</link>
      <prism:doi>10.1111/peps.12600</prism:doi>
    </item>
    <item>
      <title>Second</title>
      <link>https://example.com/b</link>
      <dc:identifier><![CDATA[doi:10.1002/job.2790]]></dc:identifier>
    </item>
    <item>
      <title>Third</title>
      <link>https://example.com/c</link>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:prism="http://prismstandard.org/namespaces/basic/2.0/">
  <title>Atom Journal</title>
  <entry>
    <title>Atom entry</title>
    <link rel="self" href="https://example.com/self"/>
    <link href="https://example.com/atom-1"/>
    <prism:doi>10.1177/0149206324</prism:doi>
  </entry>
</feed>"#;

    #[test]
    fn test_scan_rss_items() -> Result<()> {
        let scanned = scan_entry_identifiers(RSS.as_bytes())?;
        assert_eq!(scanned.len(), 3);
        assert_eq!(scanned[0].link.as_deref(), Some("https://example.com/a"));
        assert_eq!(scanned[0].prism_doi.as_deref(), Some("10.1111/peps.12600"));
        assert_eq!(scanned[1].dc_identifier.as_deref(), Some("doi:10.1002/job.2790"));
        assert_eq!(scanned[2], ScannedIdentifiers {
            link: Some("https://example.com/c".to_string()),
            ..Default::default()
        });
        Ok(())
    }

    #[test]
    fn test_scan_atom_entries() -> Result<()> {
        let scanned = scan_entry_identifiers(ATOM.as_bytes())?;
        assert_eq!(scanned.len(), 1);
        assert_eq!(scanned[0].link.as_deref(), Some("https://example.com/atom-1"));
        assert_eq!(scanned[0].prism_doi.as_deref(), Some("10.1177/0149206324"));
        Ok(())
    }

    #[test]
    fn test_match_by_position_then_link() {
        let scanned = vec![
            ScannedIdentifiers {
                link: Some("https://example.com/a".to_string()),
                ..Default::default()
            },
            ScannedIdentifiers {
                link: Some("https://example.com/b".to_string()),
                prism_doi: Some("10.1/x".to_string()),
                ..Default::default()
            },
        ];
        let by_position = match_identifiers(&scanned, 2, 1, "ignored");
        assert_eq!(by_position.and_then(|s| s.prism_doi.as_deref()), Some("10.1/x"));

        let by_link = match_identifiers(&scanned, 3, 0, "https://example.com/b");
        assert_eq!(by_link.and_then(|s| s.prism_doi.as_deref()), Some("10.1/x"));
        assert!(match_identifiers(&scanned, 3, 0, "https://example.com/z").is_none());
    }
}
