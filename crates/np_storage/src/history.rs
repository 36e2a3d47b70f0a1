//! Append-only dedup and rolling retention for the history snapshot.

use chrono::{DateTime, Duration, Utc};
use np_core::dates::parse_timestamp;
use np_core::Article;
use std::collections::HashSet;
use tracing::debug;

pub const DEFAULT_RETENTION_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryMerge {
    /// Survivors, newest `scraped_at` first.
    pub articles: Vec<Article>,
    /// Batch records whose hash was not seen before.
    pub added: usize,
    /// Records dropped for falling outside the retention window.
    pub expired: usize,
}

/// Combines the stored snapshot with a freshly scraped batch.
///
/// Only batch records with an unseen `content_hash` are appended; a hash
/// already present (in the store or earlier in the batch) is never updated.
/// The union is then cut to `retention` before `now`, keeping records whose
/// `scraped_at` cannot be parsed, and sorted by `scraped_at` descending.
pub fn merge_history(
    previous: Vec<Article>,
    batch: Vec<Article>,
    now: DateTime<Utc>,
    retention: Duration,
) -> HistoryMerge {
    let mut seen: HashSet<String> = previous.iter().map(|a| a.content_hash.clone()).collect();

    let fresh: Vec<Article> = batch
        .into_iter()
        .filter(|article| seen.insert(article.content_hash.clone()))
        .collect();
    let added = fresh.len();

    let cutoff = now - retention;
    let mut expired = 0;
    let mut articles: Vec<Article> = previous
        .into_iter()
        .chain(fresh)
        .filter(|article| match parse_timestamp(&article.scraped_at) {
            Some(scraped_at) if scraped_at < cutoff => {
                expired += 1;
                false
            }
            Some(_) => true,
            None => {
                debug!(url = %article.url, scraped_at = %article.scraped_at, "Keeping record with unparsable timestamp");
                true
            }
        })
        .collect();

    articles.sort_by(|a, b| b.scraped_at.cmp(&a.scraped_at));

    HistoryMerge {
        articles,
        added,
        expired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_core::dates::format_iso;
    use np_core::identity::content_hash;
    use np_core::Stub;

    fn scraped(title: &str, url: &str, at: DateTime<Utc>) -> Article {
        let mut article = Article::from(Stub::new("ABC", title, url));
        article.content_hash = content_hash(title, url);
        article.scraped_at = format_iso(&at);
        article
    }

    fn week() -> Duration {
        Duration::days(DEFAULT_RETENTION_DAYS)
    }

    #[test]
    fn test_only_unseen_hashes_are_added() {
        let now = Utc::now();
        let old = vec![scraped("A", "https://www.abc.es/a", now - Duration::hours(5))];
        let mut updated = scraped("A", "https://www.abc.es/a", now);
        updated.body = "texto nuevo".to_string();
        let batch = vec![updated, scraped("B", "https://www.abc.es/b", now)];

        let merged = merge_history(old, batch, now, week());
        assert_eq!(merged.added, 1);
        assert_eq!(merged.articles.len(), 2);
        let stored_a = merged.articles.iter().find(|a| a.title == "A").unwrap();
        assert!(stored_a.body.is_empty(), "seen hashes are never updated");
    }

    #[test]
    fn test_duplicates_within_batch_collapse_first_wins() {
        let now = Utc::now();
        let first = scraped("X", "http://a/b", now - Duration::minutes(1));
        let second = scraped("X", "http://a/b", now);
        let merged = merge_history(Vec::new(), vec![first.clone(), second], now, week());
        assert_eq!(merged.added, 1);
        assert_eq!(merged.articles, vec![first]);
    }

    #[test]
    fn test_second_identical_batch_adds_nothing() {
        let now = Utc::now();
        let batch = vec![scraped("A", "https://a", now), scraped("B", "https://b", now)];
        let first = merge_history(Vec::new(), batch.clone(), now, week());
        assert_eq!(first.added, 2);
        let second = merge_history(first.articles.clone(), batch, now, week());
        assert_eq!(second.added, 0);
        assert_eq!(second.articles, first.articles);
    }

    #[test]
    fn test_retention_window() {
        let now = Utc::now();
        let old = vec![
            scraped("Vieja", "https://a/old", now - Duration::days(8)),
            scraped("Reciente", "https://a/recent", now - Duration::days(6)),
        ];
        let merged = merge_history(old, Vec::new(), now, week());
        assert_eq!(merged.expired, 1);
        assert_eq!(merged.articles.len(), 1);
        assert_eq!(merged.articles[0].title, "Reciente");
    }

    #[test]
    fn test_unparsable_timestamp_is_kept() {
        let now = Utc::now();
        let mut odd = scraped("Rara", "https://a/odd", now);
        odd.scraped_at = "ayer por la tarde".to_string();
        let merged = merge_history(vec![odd], Vec::new(), now, week());
        assert_eq!(merged.articles.len(), 1);
        assert_eq!(merged.expired, 0);
    }

    #[test]
    fn test_sorted_newest_first() {
        let now = Utc::now();
        let old = vec![
            scraped("1", "https://a/1", now - Duration::days(3)),
            scraped("2", "https://a/2", now - Duration::days(1)),
        ];
        let batch = vec![scraped("3", "https://a/3", now)];
        let merged = merge_history(old, batch, now, week());
        let titles: Vec<_> = merged.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["3", "2", "1"]);
    }
}
