//! The archived article record.

use crate::doi::DOI_NOT_FOUND;
use crate::topics::{format_topics, parse_topics, UNCATEGORIZED};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Archive column order
pub const ARCHIVE_COLUMNS: &[&str] = &[
    "Journal",
    "Title",
    "Link",
    "Published Date",
    "Abstract",
    "Topics",
    "DOI",
];

/// One article in the archive. `link` is the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "Journal")]
    pub journal: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Link")]
    pub link: String,
    /// Calendar date, `YYYY-MM-DD` on disk
    #[serde(rename = "Published Date")]
    pub published_date: NaiveDate,
    #[serde(rename = "Abstract", default)]
    pub abstract_text: String,
    #[serde(
        rename = "Topics",
        serialize_with = "serialize_topics",
        deserialize_with = "deserialize_topics",
        default = "default_topics"
    )]
    pub topics: Vec<String>,
    #[serde(rename = "DOI", deserialize_with = "deserialize_doi", default = "default_doi")]
    pub doi: String,
}

impl Article {
    /// Topics as stored in the archive column
    pub fn topics_label(&self) -> String {
        format_topics(&self.topics)
    }
}

fn serialize_topics<S: Serializer>(topics: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_topics(topics))
}

fn deserialize_topics<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let cell = String::deserialize(deserializer)?;
    Ok(parse_topics(&cell))
}

fn default_topics() -> Vec<String> {
    vec![UNCATEGORIZED.to_string()]
}

fn deserialize_doi<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let cell = String::deserialize(deserializer)?;
    let cell = cell.trim();
    if cell.is_empty() {
        Ok(default_doi())
    } else {
        Ok(cell.to_string())
    }
}

fn default_doi() -> String {
    DOI_NOT_FOUND.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_header_matches_columns() -> Result<(), Box<dyn std::error::Error>> {
        let article = Article {
            journal: "Work & Stress".to_string(),
            title: "A title, with comma".to_string(),
            link: "https://example.com/a".to_string(),
            published_date: NaiveDate::from_ymd_opt(2026, 1, 5).ok_or("date")?,
            abstract_text: "Text".to_string(),
            topics: vec!["Leadership".to_string(), "Teams".to_string()],
            doi: DOI_NOT_FOUND.to_string(),
        };

        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.serialize(&article)?;
        let data = String::from_utf8(wtr.into_inner().map_err(|e| e.to_string())?)?;
        let mut lines = data.lines();
        assert_eq!(lines.next(), Some(ARCHIVE_COLUMNS.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some(r#"Work & Stress,"A title, with comma",https://example.com/a,2026-01-05,Text,"Leadership, Teams",DOI Not Found"#)
        );
        Ok(())
    }

    #[test]
    fn test_legacy_rows_get_sentinels() -> Result<(), Box<dyn std::error::Error>> {
        let data = "Journal,Title,Link,Published Date,Abstract,Topics\nJ,T,https://x,2025-12-31,A,\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let articles: Vec<Article> = rdr.deserialize().collect::<Result<_, _>>()?;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].topics, vec![UNCATEGORIZED.to_string()]);
        assert_eq!(articles[0].doi, DOI_NOT_FOUND);
        Ok(())
    }
}
