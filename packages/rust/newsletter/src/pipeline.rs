//! End-to-end newsletter build: feeds → intro → summary → tools → document.

use std::time::Instant;

use chrono::{DateTime, Local, Utc};
use tracing::{info, instrument, warn};

use toolkit_feeds::{FeedFetcher, NewsAggregator};
use toolkit_llm::ChatModel;
use toolkit_shared::Outcome;

use crate::formatter::{NewsletterContent, OutputFormat, format_date, newsletter_title};
use crate::generator::ContentGenerator;

/// Parameters for one newsletter issue.
#[derive(Debug, Clone)]
pub struct NewsletterRequest {
    pub topic: String,
    pub format: OutputFormat,
    /// Recency window for news items.
    pub days_back: u32,
    /// Issue time; drives both the recency cutoff and the printed date.
    pub now: DateTime<Local>,
}

/// A rendered issue.
#[derive(Debug)]
pub struct Newsletter {
    pub document: String,
    /// News items that fed the summary.
    pub item_count: usize,
    /// Sections that carry fallback text instead of generated text.
    pub degraded_sections: Vec<&'static str>,
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting build status.
pub trait NewsletterProgress: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the news window has been collected.
    fn news_collected(&self, count: usize);
    /// Called when the document is rendered.
    fn done(&self, newsletter: &Newsletter);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl NewsletterProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn news_collected(&self, _count: usize) {}
    fn done(&self, _newsletter: &Newsletter) {}
}

/// Build one issue. Never fails: each section falls back independently.
#[instrument(skip_all, fields(topic = %request.topic, days_back = request.days_back))]
pub async fn build_newsletter<F, M>(
    aggregator: &NewsAggregator<F>,
    generator: &ContentGenerator<M>,
    request: &NewsletterRequest,
    progress: &dyn NewsletterProgress,
) -> Newsletter
where
    F: FeedFetcher,
    M: ChatModel,
{
    let start = Instant::now();
    let mut degraded_sections = Vec::new();

    // Phase 1: collect news
    progress.phase("Fetching news");
    let news = aggregator
        .latest_at(request.days_back, request.now.with_timezone(&Utc))
        .await;
    progress.news_collected(news.len());

    // Phase 2: generated sections
    progress.phase("Writing introduction");
    let intro = take_section(
        generator.generate_intro(&request.topic).await,
        "intro",
        &mut degraded_sections,
    );

    progress.phase("Summarizing news");
    let summary = take_section(
        generator.summarize_news(&news).await,
        "summary",
        &mut degraded_sections,
    );

    progress.phase("Suggesting tools");
    let tools = take_section(
        generator.suggest_tools().await,
        "tools",
        &mut degraded_sections,
    );

    // Phase 3: render
    progress.phase("Rendering");
    let content = NewsletterContent {
        title: newsletter_title(&request.topic),
        intro,
        summary,
        tools,
        date: format_date(request.now.date_naive()),
    };

    let newsletter = Newsletter {
        document: request.format.render(&content),
        item_count: news.len(),
        degraded_sections,
        elapsed: start.elapsed(),
    };

    info!(
        items = newsletter.item_count,
        degraded = newsletter.degraded_sections.len(),
        elapsed_ms = newsletter.elapsed.as_millis() as u64,
        "newsletter built"
    );
    progress.done(&newsletter);
    newsletter
}

fn take_section(
    outcome: Outcome<String>,
    section: &'static str,
    degraded: &mut Vec<&'static str>,
) -> String {
    if let Some(reason) = outcome.reason() {
        warn!(section, reason, "section uses fallback text");
        degraded.push(section);
    }
    outcome.into_value()
}
