//! Filtering and sorting over the archive.
//!
//! Used by the `list` and `summarize` commands and by the HTTP view.

use crate::article::Article;
use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Publication date window, relative to today
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    LastWeek,
    Last30Days,
    Last90Days,
    Last6Months,
    Last12Months,
    Last2Years,
    #[default]
    AllTime,
}

impl DateRange {
    /// Earliest publication date included, or `None` for no limit.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateRange::LastWeek => today.checked_sub_signed(Duration::weeks(1)),
            DateRange::Last30Days => today.checked_sub_signed(Duration::days(30)),
            DateRange::Last90Days => today.checked_sub_signed(Duration::days(90)),
            DateRange::Last6Months => today.checked_sub_months(Months::new(6)),
            DateRange::Last12Months => today.checked_sub_months(Months::new(12)),
            DateRange::Last2Years => today.checked_sub_months(Months::new(24)),
            DateRange::AllTime => None,
        }
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last-week" | "week" => Ok(DateRange::LastWeek),
            "last-30-days" | "30d" => Ok(DateRange::Last30Days),
            "last-90-days" | "90d" => Ok(DateRange::Last90Days),
            "last-6-months" | "6m" => Ok(DateRange::Last6Months),
            "last-12-months" | "12m" => Ok(DateRange::Last12Months),
            "last-2-years" | "2y" => Ok(DateRange::Last2Years),
            "all-time" | "all" | "" => Ok(DateRange::AllTime),
            other => Err(format!("Unknown date range: {}", other)),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Journal,
    Title,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" | "" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "journal" => Ok(SortOrder::Journal),
            "title" => Ok(SortOrder::Title),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Filter settings; empty lists mean "everything"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleFilter {
    pub range: DateRange,
    pub journals: Vec<String>,
    pub topics: Vec<String>,
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl ArticleFilter {
    /// Whether an article passes every filter.
    pub fn matches(&self, article: &Article, cutoff: Option<NaiveDate>) -> bool {
        if let Some(cutoff) = cutoff {
            if article.published_date < cutoff {
                return false;
            }
        }

        if !self.journals.is_empty() && !self.journals.iter().any(|j| j == &article.journal) {
            return false;
        }

        if !self.topics.is_empty() {
            let label = article.topics_label().to_lowercase();
            if !self
                .topics
                .iter()
                .any(|t| label.contains(&t.trim().to_lowercase()))
            {
                return false;
            }
        }

        if let Some(query) = self.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            if !article.title.to_lowercase().contains(&query)
                && !article.abstract_text.to_lowercase().contains(&query)
            {
                return false;
            }
        }

        true
    }

    /// Filter and sort `articles`.
    pub fn apply<'a>(&self, articles: &'a [Article], today: NaiveDate) -> Vec<&'a Article> {
        let cutoff = self.range.cutoff(today);
        let mut selected: Vec<&Article> = articles
            .iter()
            .filter(|a| self.matches(a, cutoff))
            .collect();

        match self.sort {
            SortOrder::Newest => selected.sort_by(|a, b| b.published_date.cmp(&a.published_date)),
            SortOrder::Oldest => selected.sort_by(|a, b| a.published_date.cmp(&b.published_date)),
            SortOrder::Journal => selected.sort_by(|a, b| a.journal.cmp(&b.journal)),
            SortOrder::Title => selected.sort_by(|a, b| a.title.cmp(&b.title)),
        }
        selected
    }
}

/// Size and date span of a result set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSummary {
    pub count: usize,
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

impl ViewSummary {
    pub fn of(articles: &[&Article]) -> Self {
        Self {
            count: articles.len(),
            earliest: articles.iter().map(|a| a.published_date).min(),
            latest: articles.iter().map(|a| a.published_date).max(),
        }
    }
}

/// Split a comma-separated CLI/query value into trimmed items.
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doi::DOI_NOT_FOUND;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn article(journal: &str, title: &str, published: NaiveDate, topics: &[&str]) -> Article {
        Article {
            journal: journal.to_string(),
            title: title.to_string(),
            link: format!("https://example.com/{}", title.replace(' ', "-")),
            published_date: published,
            abstract_text: format!("About {}", title.to_lowercase()),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            doi: DOI_NOT_FOUND.to_string(),
        }
    }

    fn sample() -> Vec<Article> {
        vec![
            article("Work & Stress", "Burnout in nurses", date(2026, 3, 1), &["Turnover/Burnout"]),
            article("Personnel Psychology", "Assessment centres", date(2025, 6, 1), &["Assessment"]),
            article("Human Performance", "Team cognition", date(2026, 2, 10), &["Teams", "Performance/Productivity"]),
        ]
    }

    #[test]
    fn test_date_range_cutoffs() {
        let today = date(2026, 3, 31);
        assert_eq!(DateRange::LastWeek.cutoff(today), Some(date(2026, 3, 24)));
        assert_eq!(DateRange::Last6Months.cutoff(today), Some(date(2025, 9, 30)));
        assert_eq!(DateRange::Last2Years.cutoff(today), Some(date(2024, 3, 31)));
        assert_eq!(DateRange::AllTime.cutoff(today), None);
        assert_eq!("90d".parse::<DateRange>(), Ok(DateRange::Last90Days));
        assert!("fortnight".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_range_includes_cutoff_day() {
        let today = date(2026, 3, 31);
        let articles = vec![
            article("J", "On the cutoff", date(2026, 3, 24), &[]),
            article("J", "Day before", date(2026, 3, 23), &[]),
        ];
        let filter = ArticleFilter {
            range: DateRange::LastWeek,
            ..Default::default()
        };
        let titles: Vec<&str> = filter
            .apply(&articles, today)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["On the cutoff"]);
    }

    #[test]
    fn test_filter_by_range_and_topic() {
        let articles = sample();
        let filter = ArticleFilter {
            range: DateRange::Last90Days,
            topics: vec!["teams".to_string()],
            ..Default::default()
        };
        let result = filter.apply(&articles, date(2026, 3, 31));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Team cognition");
    }

    #[test]
    fn test_search_matches_title_or_abstract() {
        let articles = sample();
        let filter = ArticleFilter {
            search: Some("NURSES".to_string()),
            ..Default::default()
        };
        let result = filter.apply(&articles, date(2026, 3, 31));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].journal, "Work & Stress");
    }

    #[test]
    fn test_sort_orders() {
        let articles = sample();
        let today = date(2026, 3, 31);

        let newest = ArticleFilter::default().apply(&articles, today);
        assert_eq!(newest[0].title, "Burnout in nurses");

        let by_journal = ArticleFilter {
            sort: SortOrder::Journal,
            ..Default::default()
        }
        .apply(&articles, today);
        assert_eq!(by_journal[0].journal, "Human Performance");

        let oldest = ArticleFilter {
            sort: SortOrder::Oldest,
            journals: vec!["Work & Stress".to_string(), "Human Performance".to_string()],
            ..Default::default()
        }
        .apply(&articles, today);
        let titles: Vec<&str> = oldest.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Team cognition", "Burnout in nurses"]);
    }

    #[test]
    fn test_view_summary() {
        let articles = sample();
        let all: Vec<&Article> = articles.iter().collect();
        let summary = ViewSummary::of(&all);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.earliest, Some(date(2025, 6, 1)));
        assert_eq!(summary.latest, Some(date(2026, 3, 1)));
        assert_eq!(split_list(Some("a, b,,c")), vec!["a", "b", "c"]);
    }
}
