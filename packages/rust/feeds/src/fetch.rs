//! HTTP feed fetching.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, instrument};

use toolkit_shared::{MissingDatePolicy, NewsItem, Result, ToolkitError};

use crate::parse::{ParseOptions, parse_feed};
use crate::{FeedFetcher, FeedSource};

/// Maximum number of redirects to follow per feed.
const MAX_REDIRECTS: usize = 5;

/// Default timeout in seconds for one feed request.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum feed body size we accept (10 MB).
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// User-Agent string for feed requests.
const USER_AGENT: &str = concat!("ai-toolkit/", env!("CARGO_PKG_VERSION"));

/// Fetches feeds over HTTP and parses them with `feed-rs`.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: Client,
    max_entries: usize,
    missing_date: MissingDatePolicy,
}

impl HttpFeedFetcher {
    pub fn new(max_entries: usize, missing_date: MissingDatePolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ToolkitError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_entries,
            missing_date,
        })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    #[instrument(skip_all, fields(source = %source.name, url = %source.url))]
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<NewsItem>> {
        let url = source.url.as_str();
        let response = self
            .client
            .get(source.url.clone())
            .send()
            .await
            .map_err(|e| ToolkitError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolkitError::Network(format!("{url}: HTTP {status}")));
        }

        if let Some(len) = response.content_length() {
            if len > MAX_RESPONSE_SIZE {
                return Err(ToolkitError::validation(format!(
                    "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
                )));
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ToolkitError::Network(format!("{url}: failed to read body: {e}")))?;

        debug!(bytes = body.len(), "feed downloaded");

        let opts = ParseOptions {
            max_entries: self.max_entries,
            missing_date: self.missing_date,
            fetched_at: Utc::now(),
        };
        parse_feed(&body, &source.name, &opts)
    }
}
