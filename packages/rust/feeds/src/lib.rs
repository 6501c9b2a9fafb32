//! News aggregation from RSS / Atom feed sources.
//!
//! Sources are fetched one at a time. A failing source is logged and
//! contributes nothing; the others are unaffected. Items are filtered to a
//! recency window and returned newest first.

mod fetch;
mod parse;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, instrument};
use url::Url;

use toolkit_shared::{FeedSourceConfig, NewsItem, Outcome, Result, ToolkitError};

pub use fetch::HttpFeedFetcher;
pub use parse::{ParseOptions, html_to_text, parse_feed, resolve_published};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// A named feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    /// Source tag attached to every item.
    pub name: String,
    pub url: Url,
}

impl TryFrom<&FeedSourceConfig> for FeedSource {
    type Error = ToolkitError;

    fn try_from(config: &FeedSourceConfig) -> Result<Self> {
        let url = Url::parse(&config.url).map_err(|e| {
            ToolkitError::config(format!(
                "invalid url for feed '{}' ({}): {e}",
                config.name, config.url
            ))
        })?;
        Ok(Self {
            name: config.name.clone(),
            url,
        })
    }
}

/// Fetches one source's items.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<NewsItem>>;
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Polls a fixed list of sources.
pub struct NewsAggregator<F> {
    fetcher: F,
    sources: Vec<FeedSource>,
}

impl<F: FeedFetcher> NewsAggregator<F> {
    pub fn new(fetcher: F, sources: Vec<FeedSource>) -> Self {
        Self { fetcher, sources }
    }

    /// Build an aggregator from configured sources.
    pub fn from_config(fetcher: F, feeds: &[FeedSourceConfig]) -> Result<Self> {
        let sources = feeds
            .iter()
            .map(FeedSource::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(fetcher, sources))
    }

    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    /// Fetch one source, degrading to no items on failure.
    pub async fn fetch_source(&self, source: &FeedSource) -> Outcome<Vec<NewsItem>> {
        match self.fetcher.fetch(source).await {
            Ok(items) => {
                info!(source = %source.name, items = items.len(), "fetched feed");
                Outcome::Success(items)
            }
            Err(e) => {
                error!(source = %source.name, error = %e, "error fetching feed");
                Outcome::degraded(Vec::new(), e)
            }
        }
    }

    /// Items from the last `days_back` days across all sources, newest first.
    pub async fn latest(&self, days_back: u32) -> Vec<NewsItem> {
        self.latest_at(days_back, Utc::now()).await
    }

    /// [`latest`](Self::latest) with an explicit "now".
    #[instrument(skip(self), fields(sources = self.sources.len()))]
    pub async fn latest_at(&self, days_back: u32, now: DateTime<Utc>) -> Vec<NewsItem> {
        let cutoff = now
            .checked_sub_signed(Duration::days(i64::from(days_back)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut all_news = Vec::new();

        for source in &self.sources {
            let items = self.fetch_source(source).await.into_value();
            all_news.extend(filter_recent(items, cutoff));
        }

        sort_newest_first(&mut all_news);
        info!(items = all_news.len(), "aggregated recent news");
        all_news
    }
}

/// Keep items published at or after `cutoff`.
pub fn filter_recent(items: Vec<NewsItem>, cutoff: DateTime<Utc>) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter(|item| item.published >= cutoff)
        .collect()
}

/// Stable sort by publication time, newest first.
pub fn sort_newest_first(items: &mut [NewsItem]) {
    items.sort_by(|a, b| b.published.cmp(&a.published));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn item(title: &str, source: &str, days_ago: i64) -> NewsItem {
        NewsItem {
            title: title.into(),
            description: String::new(),
            url: format!("https://example.com/{title}"),
            source: source.into(),
            published: now() - Duration::days(days_ago),
            category: "general".into(),
        }
    }

    fn source(name: &str) -> FeedSource {
        FeedSource {
            name: name.into(),
            url: Url::parse(&format!("https://{name}.example.com/feed")).unwrap(),
        }
    }

    /// Serves canned items per source name; unknown names fail.
    struct CannedFetcher {
        items: HashMap<String, Vec<NewsItem>>,
    }

    #[async_trait]
    impl FeedFetcher for CannedFetcher {
        async fn fetch(&self, source: &FeedSource) -> Result<Vec<NewsItem>> {
            self.items
                .get(&source.name)
                .cloned()
                .ok_or_else(|| ToolkitError::Network(format!("{}: HTTP 500", source.url)))
        }
    }

    #[tokio::test]
    async fn failing_source_is_isolated() {
        let fetcher = CannedFetcher {
            items: HashMap::from([
                ("alpha".to_string(), vec![item("a1", "alpha", 1)]),
                ("gamma".to_string(), vec![item("g1", "gamma", 2)]),
            ]),
        };
        let aggregator =
            NewsAggregator::new(fetcher, vec![source("alpha"), source("broken"), source("gamma")]);

        let news = aggregator.latest_at(7, now()).await;
        let sources: Vec<&str> = news.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, vec!["alpha", "gamma"]);
    }

    #[tokio::test]
    async fn fetch_source_reports_degradation() {
        let fetcher = CannedFetcher {
            items: HashMap::new(),
        };
        let aggregator = NewsAggregator::new(fetcher, vec![source("broken")]);

        let outcome = aggregator.fetch_source(&aggregator.sources()[0]).await;
        assert!(outcome.is_degraded());
        assert!(outcome.value().is_empty());
    }

    #[tokio::test]
    async fn filters_by_window_and_sorts_newest_first() {
        let fetcher = CannedFetcher {
            items: HashMap::from([
                (
                    "alpha".to_string(),
                    vec![item("old", "alpha", 30), item("mid", "alpha", 3)],
                ),
                (
                    "beta".to_string(),
                    vec![item("new", "beta", 0), item("edge", "beta", 7)],
                ),
            ]),
        };
        let aggregator = NewsAggregator::new(fetcher, vec![source("alpha"), source("beta")]);

        let news = aggregator.latest_at(7, now()).await;
        let titles: Vec<&str> = news.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid", "edge"]);
    }

    #[tokio::test]
    async fn oversized_window_keeps_everything() {
        let fetcher = CannedFetcher {
            items: HashMap::from([(
                "alpha".to_string(),
                vec![item("recent", "alpha", 1), item("ancient", "alpha", 3650)],
            )]),
        };
        let aggregator = NewsAggregator::new(fetcher, vec![source("alpha")]);

        let news = aggregator.latest_at(u32::MAX, now()).await;
        let titles: Vec<&str> = news.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["recent", "ancient"]);
    }

    #[test]
    fn sort_keeps_input_order_for_ties() {
        let mut items = vec![
            item("first", "alpha", 2),
            item("newest", "alpha", 0),
            item("second", "beta", 2),
            item("third", "gamma", 2),
        ];
        sort_newest_first(&mut items);

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "first", "second", "third"]);
    }

    #[test]
    fn zero_day_window_keeps_only_now() {
        let items = vec![item("today", "a", 0), item("yesterday", "a", 1)];
        let kept = filter_recent(items, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "today");
    }

    #[test]
    fn source_from_config_validates_url() {
        let good = FeedSourceConfig {
            name: "arxiv_ai".into(),
            url: "http://export.arxiv.org/rss/cs.AI".into(),
        };
        assert_eq!(FeedSource::try_from(&good).unwrap().name, "arxiv_ai");

        let bad = FeedSourceConfig {
            name: "broken".into(),
            url: "::not a url".into(),
        };
        let err = FeedSource::try_from(&bad).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
