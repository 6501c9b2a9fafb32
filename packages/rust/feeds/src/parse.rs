//! RSS / Atom document → [`NewsItem`]s.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use regex::Regex;
use scraper::{Html, Node};

use toolkit_shared::types::default_category;
use toolkit_shared::{MissingDatePolicy, NewsItem, Result, ToolkitError};

/// Title used for entries that carry none.
const UNTITLED: &str = "(untitled)";

/// Options for turning one feed document into items.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Entries taken from the head of the feed.
    pub max_entries: usize,
    pub missing_date: MissingDatePolicy,
    /// When the document was fetched (stands in for missing dates).
    pub fetched_at: DateTime<Utc>,
}

/// Parse a feed body and map its leading entries to news items.
pub fn parse_feed(body: &[u8], source: &str, opts: &ParseOptions) -> Result<Vec<NewsItem>> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| ToolkitError::parse(format!("{source}: invalid feed: {e}")))?;

    Ok(feed
        .entries
        .into_iter()
        .take(opts.max_entries)
        .filter_map(|entry| entry_to_item(entry, source, opts))
        .collect())
}

fn entry_to_item(entry: Entry, source: &str, opts: &ParseOptions) -> Option<NewsItem> {
    let published = resolve_published(
        entry.published,
        entry.updated,
        opts.missing_date,
        opts.fetched_at,
    )?;

    let title = entry
        .title
        .map(|t| html_to_text(&t.content))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let description = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .map(|d| html_to_text(&d))
        .unwrap_or_default();

    let url = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone())
        .unwrap_or_default();

    let category = entry
        .categories
        .first()
        .map(|c| c.term.clone())
        .unwrap_or_else(default_category);

    Some(NewsItem {
        title,
        description,
        url,
        source: source.to_string(),
        published,
        category,
    })
}

/// Pick the publication timestamp for an entry.
///
/// `published` wins, then `updated`; with neither, the policy decides
/// between the fetch time and dropping the entry (`None`).
pub fn resolve_published(
    published: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
    policy: MissingDatePolicy,
    fetched_at: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (published.or(updated), policy) {
        (Some(ts), _) => Some(ts),
        (None, MissingDatePolicy::FetchTime) => Some(fetched_at),
        (None, MissingDatePolicy::Drop) => None,
    }
}

/// Elements that start a new run of text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td",
    "blockquote",
];

/// Strip markup and collapse whitespace.
pub fn html_to_text(input: &str) -> String {
    static WHITESPACE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    let text = if input.contains('<') || input.contains('&') {
        let fragment = Html::parse_fragment(input);
        let mut text = String::new();
        for node in fragment.root_element().descendants() {
            match node.value() {
                Node::Text(t) => text.push_str(t),
                Node::Element(el) if BLOCK_TAGS.contains(&el.name()) => text.push(' '),
                _ => {}
            }
        }
        text
    } else {
        input.to_string()
    };

    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixture(name: &str) -> Vec<u8> {
        let path = format!("../../../fixtures/feeds/{name}");
        std::fs::read(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    fn opts(max_entries: usize) -> ParseOptions {
        ParseOptions {
            max_entries,
            missing_date: MissingDatePolicy::FetchTime,
            fetched_at: Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn parses_rss2_items() {
        let items = parse_feed(&fixture("rss2.xml"), "ml_blog", &opts(10)).unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Serving LLMs with vLLM");
        assert_eq!(items[0].url, "https://ml.example.com/posts/serving-vllm");
        assert_eq!(items[0].source, "ml_blog");
        assert_eq!(items[0].category, "general");
        assert_eq!(
            items[0].published,
            Utc.with_ymd_and_hms(2026, 10, 13, 9, 0, 0).unwrap()
        );
        assert_eq!(
            items[0].description,
            "A practical guide to high-throughput inference."
        );
    }

    #[test]
    fn caps_entries_per_feed() {
        let items = parse_feed(&fixture("rss2.xml"), "ml_blog", &opts(2)).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Serving LLMs with vLLM", "Evaluating RAG Pipelines"]);
    }

    #[test]
    fn parses_atom_entries() {
        let items = parse_feed(&fixture("atom.xml"), "research", &opts(10)).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://research.example.com/sparse-attention");
        assert_eq!(items[0].description, "We study sparse attention");
        assert_eq!(
            items[0].published,
            Utc.with_ymd_and_hms(2026, 10, 14, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_non_feed_body() {
        let result = parse_feed(b"<html><body>Not a feed</body></html>", "bad", &opts(10));
        assert!(result.is_err());
    }

    #[test]
    fn published_prefers_published_then_updated() {
        let fetched = Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap();
        let published = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2026, 10, 2, 0, 0, 0).unwrap();

        assert_eq!(
            resolve_published(Some(published), Some(updated), MissingDatePolicy::Drop, fetched),
            Some(published)
        );
        assert_eq!(
            resolve_published(None, Some(updated), MissingDatePolicy::Drop, fetched),
            Some(updated)
        );
    }

    #[test]
    fn missing_date_policy() {
        let fetched = Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap();
        assert_eq!(
            resolve_published(None, None, MissingDatePolicy::FetchTime, fetched),
            Some(fetched)
        );
        assert_eq!(
            resolve_published(None, None, MissingDatePolicy::Drop, fetched),
            None
        );
    }

    #[test]
    fn html_to_text_strips_markup() {
        assert_eq!(html_to_text("<p>Hello <em>world</em></p>"), "Hello world");
        assert_eq!(html_to_text("  plain\n\ttext  "), "plain text");
        assert_eq!(html_to_text("R&amp;D"), "R&D");
        assert_eq!(html_to_text(""), "");
    }

    #[test]
    fn html_to_text_keeps_inline_words_whole() {
        assert_eq!(html_to_text("GPT<sub>4</sub> released"), "GPT4 released");
        assert_eq!(
            html_to_text("<b>Llama</b>3.1 and <a href=\"#\">vLLM</a>"),
            "Llama3.1 and vLLM"
        );
        assert_eq!(html_to_text("<p>First.</p><p>Second.</p>"), "First. Second.");
        assert_eq!(html_to_text("line<br>break"), "line break");
    }
}
