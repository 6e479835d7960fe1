//! Small text helpers shared by the feed and scraping code.

use scraper::Html;

/// Strip HTML tags from text and decode character references.
///
/// Text nodes are joined with a space, so adjacent block elements never
/// run their words together.
pub fn strip_html_tags(text: &str) -> String {
    Html::parse_fragment(text)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Feed-supplied markup reduced to plain text.
pub fn clean_feed_text(text: &str) -> String {
    normalize_ws(&strip_html_tags(text))
}

/// First `max` characters of `text`, for log lines.
pub fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_feed_text() {
        assert_eq!(clean_feed_text("<p>Hello</p>"), "Hello");
        assert_eq!(clean_feed_text("No tags"), "No tags");
        assert_eq!(
            clean_feed_text("<b>Bold</b> and\n  <i>italic</i>"),
            "Bold and italic"
        );
    }

    #[test]
    fn test_clean_feed_text_decodes_entities() {
        assert_eq!(clean_feed_text("Work &amp; Stress"), "Work & Stress");
        assert_eq!(
            clean_feed_text("Workers&#8217; well&nbsp;being"),
            "Workers\u{2019} well being"
        );
        assert_eq!(clean_feed_text("&lt;p&gt;"), "<p>");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("Über alles", 4), "Über");
        assert_eq!(preview("ab", 10), "ab");
    }
}
