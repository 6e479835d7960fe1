//! Persistent CSV archive of every article ever ingested.
//!
//! The archive is read wholesale, merged with the latest fetch (keep the
//! newest copy per link) and written back through a temp file + rename so a
//! crash mid-write never leaves a truncated archive behind.

use crate::article::Article;
use crate::error::{JournalError, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Default archive file name
pub const DEFAULT_ARCHIVE_PATH: &str = "io_psych_articles.csv";

/// CSV archive at a fixed path
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
}

impl Archive {
    /// Create an archive handle; nothing is read until [`Archive::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the archive file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: impl ToString) -> JournalError {
        JournalError::ArchiveCorrupt {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Load all records.
    ///
    /// A missing file is an empty archive. A file that exists but cannot be
    /// read or parsed is an error, so a bad archive is never overwritten
    /// with only the latest batch.
    pub fn load(&self) -> Result<Vec<Article>> {
        if !self.path.try_exists()? {
            debug!(path = %self.path.display(), "Archive not found, starting empty");
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| self.corrupt(e))?;
        let articles = reader
            .deserialize()
            .collect::<std::result::Result<Vec<Article>, _>>()
            .map_err(|e| self.corrupt(e))?;

        info!(path = %self.path.display(), count = articles.len(), "Loaded archive");
        Ok(articles)
    }

    /// Overwrite the archive with `articles`.
    pub fn write(&self, articles: &[Article]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(true)
                .from_writer(&mut tmp);
            for article in articles {
                wtr.serialize(article)?;
            }
            wtr.flush()?;
        }
        // Replacing the file must not reset its mode to the temp file's 0600.
        match fs::metadata(&self.path) {
            Ok(existing) => tmp.as_file().set_permissions(existing.permissions())?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| JournalError::Io(e.error))?;

        debug!(path = %self.path.display(), count = articles.len(), "Archive written");
        Ok(())
    }

    /// Merge freshly fetched records into the archive.
    ///
    /// Returns the record count after the merge, or `None` when `new` is
    /// empty and the file was left untouched.
    pub fn merge(&self, new: Vec<Article>) -> Result<Option<usize>> {
        if new.is_empty() {
            debug!("No new records, archive untouched");
            return Ok(None);
        }

        let baseline = self.load()?;
        let baseline_count = baseline.len();
        let fetched_count = new.len();
        let merged = merge_records(baseline, new);

        self.write(&merged)?;
        info!(
            baseline = baseline_count,
            fetched = fetched_count,
            total = merged.len(),
            "Archive merged"
        );
        Ok(Some(merged.len()))
    }
}

/// Union `baseline` and `new`, keep the last record per link, newest first.
///
/// `new` logically follows `baseline`, so a re-fetched article replaces its
/// archived copy. The sort is stable: same-day records keep their relative
/// order.
pub fn merge_records(baseline: Vec<Article>, new: Vec<Article>) -> Vec<Article> {
    let combined: Vec<Article> = baseline.into_iter().chain(new).collect();

    let last_index: HashMap<&str, usize> = combined
        .iter()
        .enumerate()
        .map(|(i, a)| (a.link.as_str(), i))
        .collect();
    let keep: HashSet<usize> = last_index.into_values().collect();

    let mut merged: Vec<Article> = combined
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, a)| a)
        .collect();

    merged.sort_by(|a, b| b.published_date.cmp(&a.published_date));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doi::DOI_NOT_FOUND;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn article(link: &str, date: (i32, u32, u32), abstract_text: &str) -> Article {
        Article {
            journal: "Personnel Psychology".to_string(),
            title: format!("Title for {}", link),
            link: link.to_string(),
            published_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .expect("valid date"),
            abstract_text: abstract_text.to_string(),
            topics: vec!["Teams".to_string()],
            doi: DOI_NOT_FOUND.to_string(),
        }
    }

    #[test]
    fn test_merge_override_keeps_new_copy() {
        let baseline = vec![article("X", (2026, 1, 1), "old")];
        let new = vec![article("X", (2026, 1, 1), "new")];
        let merged = merge_records(baseline, new);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].abstract_text, "new");
    }

    #[test]
    fn test_merge_sorts_newest_first() {
        let baseline = vec![
            article("a", (2025, 11, 2), "a"),
            article("b", (2026, 2, 1), "b"),
        ];
        let new = vec![article("c", (2026, 1, 15), "c")];
        let merged = merge_records(baseline, new);
        let links: Vec<&str> = merged.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_load_missing_is_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let archive = Archive::new(dir.path().join("missing.csv"));
        assert!(archive.load()?.is_empty());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_load_unreachable_path_is_error() -> Result<()> {
        let dir = TempDir::new()?;
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file")?;
        let archive = Archive::new(blocker.join("archive.csv"));

        assert!(matches!(archive.load(), Err(JournalError::Io(_))));
        assert!(archive.merge(vec![article("a", (2026, 1, 1), "a")]).is_err());
        assert_eq!(std::fs::read_to_string(&blocker)?, "plain file");
        Ok(())
    }

    #[test]
    fn test_load_corrupt_is_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("archive.csv");
        std::fs::write(&path, "Journal,Title,Link,Published Date\nJ,T,L,not-a-date\n")?;
        let archive = Archive::new(&path);
        assert!(matches!(
            archive.load(),
            Err(JournalError::ArchiveCorrupt { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_merge_empty_leaves_file_untouched() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("archive.csv");
        let archive = Archive::new(&path);
        archive.merge(vec![article("a", (2026, 1, 1), "a")])?;
        let before = std::fs::read(&path)?;

        assert_eq!(archive.merge(Vec::new())?, None);
        assert_eq!(std::fs::read(&path)?, before);
        Ok(())
    }

    #[test]
    fn test_merge_empty_does_not_create_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("archive.csv");
        assert_eq!(Archive::new(&path).merge(Vec::new())?, None);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_merge_twice_is_idempotent() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("archive.csv");
        let archive = Archive::new(&path);
        let batch = vec![
            article("a", (2026, 1, 1), "a"),
            article("b", (2026, 1, 3), "b"),
        ];

        assert_eq!(archive.merge(batch.clone())?, Some(2));
        let once = std::fs::read(&path)?;
        assert_eq!(archive.merge(batch)?, Some(2));
        assert_eq!(std::fs::read(&path)?, once);
        Ok(())
    }

    #[test]
    fn test_round_trip_through_file() -> Result<()> {
        let dir = TempDir::new()?;
        let archive = Archive::new(dir.path().join("archive.csv"));
        let records = vec![article("a", (2026, 3, 1), "Abstract, with \"quotes\"")];
        archive.write(&records)?;
        assert_eq!(archive.load()?, records);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_merge_keeps_file_permissions() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new()?;
        let path = dir.path().join("archive.csv");
        let archive = Archive::new(&path);
        archive.write(&[article("a", (2026, 1, 1), "a")])?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644))?;

        archive.merge(vec![article("b", (2026, 1, 2), "b")])?;
        let mode = std::fs::metadata(&path)?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        Ok(())
    }
}
