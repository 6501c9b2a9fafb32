//! Weekly newsletter generation.
//!
//! Recent news is summarized by the hosted model alongside a generated
//! intro and tool suggestions, then rendered as HTML or Markdown.

mod formatter;
mod generator;
mod pipeline;

pub use formatter::{
    NewsletterContent, OutputFormat, format_date, format_html, format_markdown, newsletter_title,
};
pub use generator::{
    ContentGenerator, NO_NEWS, SUMMARY_FALLBACK, TOOLS_FALLBACK, format_news_items,
    intro_fallback,
};
pub use pipeline::{
    Newsletter, NewsletterProgress, NewsletterRequest, SilentProgress, build_newsletter,
};
