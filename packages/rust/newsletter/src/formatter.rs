//! Newsletter document rendering (HTML and Markdown).
//!
//! Pure string templating: the same content always renders to the same
//! bytes. Section text is inserted verbatim.

use chrono::NaiveDate;

/// Everything a rendered newsletter contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsletterContent {
    pub title: String,
    pub intro: String,
    pub summary: String,
    pub tools: String,
    /// Pre-formatted issue date (see [`format_date`]).
    pub date: String,
}

/// Output document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Html,
    Markdown,
}

impl OutputFormat {
    /// Render `content` in this format.
    pub fn render(self, content: &NewsletterContent) -> String {
        match self {
            Self::Html => format_html(content),
            Self::Markdown => format_markdown(content),
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!("unknown format '{other}': expected 'html' or 'markdown'")),
        }
    }
}

/// Issue title for a topic.
pub fn newsletter_title(topic: &str) -> String {
    format!("{topic} Weekly Newsletter")
}

/// Issue date as printed in the header (e.g., `October 16, 2026`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

const HTML_STYLE: &str = "        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; border-radius: 10px; text-align: center; margin-bottom: 30px; }
        .section { margin-bottom: 30px; padding: 20px; border-left: 4px solid #667eea; background: #f8f9ff; }
        .footer { text-align: center; color: #666; border-top: 1px solid #eee; padding-top: 20px; margin-top: 40px; }
        h1 { margin: 0; font-size: 2.5em; }
        h2 { color: #667eea; border-bottom: 2px solid #667eea; padding-bottom: 10px; }
        .date { font-style: italic; opacity: 0.8; }
";

/// Render a standalone HTML document with inline styling.
pub fn format_html(content: &NewsletterContent) -> String {
    let NewsletterContent {
        title,
        intro,
        summary,
        tools,
        date,
    } = content;

    format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
{HTML_STYLE}    </style>
</head>
<body>
    <div class="header">
        <h1>🤖 {title}</h1>
        <p class="date">{date}</p>
    </div>

    <div class="section">
        <h2>👋 Welcome</h2>
        <p>{intro}</p>
    </div>

    <div class="section">
        <h2>📰 This Week in AI</h2>
        <div>{summary}</div>
    </div>

    <div class="section">
        <h2>🛠️ Tools & Resources</h2>
        <div>{tools}</div>
    </div>

    <div class="footer">
        <p>Thank you for reading! Share this newsletter with fellow AI engineers.</p>
        <p><a href="#">Unsubscribe</a> | <a href="#">Archive</a> | <a href="#">Website</a></p>
    </div>
</body>
</html>
"##
    )
}

/// Render the same five sections as Markdown.
pub fn format_markdown(content: &NewsletterContent) -> String {
    let NewsletterContent {
        title,
        intro,
        summary,
        tools,
        date,
    } = content;

    format!(
        "# 🤖 {title}

*{date}*

## 👋 Welcome

{intro}

## 📰 This Week in AI

{summary}

## 🛠️ Tools & Resources

{tools}

---

Thank you for reading! Share this newsletter with fellow AI engineers.

[Unsubscribe](#) | [Archive](#) | [Website](#)
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> NewsletterContent {
        NewsletterContent {
            title: newsletter_title("AI Engineering"),
            intro: "Welcome back!".into(),
            summary: "1. Key Highlights".into(),
            tools: "- vLLM".into(),
            date: format_date(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()),
        }
    }

    #[test]
    fn title_and_date_helpers() {
        assert_eq!(newsletter_title("MLOps"), "MLOps Weekly Newsletter");
        assert_eq!(
            format_date(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()),
            "March 05, 2026"
        );
    }

    #[test]
    fn html_has_all_sections() {
        let html = format_html(&content());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>AI Engineering Weekly Newsletter</title>"));
        assert!(html.contains(r#"<p class="date">October 16, 2026</p>"#));
        assert!(html.contains("<p>Welcome back!</p>"));
        assert!(html.contains("<div>1. Key Highlights</div>"));
        assert!(html.contains("<div>- vLLM</div>"));
        assert!(html.contains(r#"<div class="footer">"#));
        assert!(html.contains(".header { background: linear-gradient"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn markdown_has_all_sections() {
        let md = format_markdown(&content());
        assert!(md.starts_with("# 🤖 AI Engineering Weekly Newsletter\n\n*October 16, 2026*"));
        assert!(md.contains("## 👋 Welcome\n\nWelcome back!"));
        assert!(md.contains("## 📰 This Week in AI\n\n1. Key Highlights"));
        assert!(md.contains("## 🛠️ Tools & Resources\n\n- vLLM"));
        assert!(md.contains("[Unsubscribe](#) | [Archive](#) | [Website](#)"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let c = content();
        assert_eq!(format_html(&c), format_html(&c));
        assert_eq!(format_markdown(&c), format_markdown(&c));
        assert_eq!(OutputFormat::Html.render(&c), format_html(&c));
        assert_eq!(OutputFormat::Markdown.render(&c), format_markdown(&c));
    }

    #[test]
    fn empty_fields_render_as_empty() {
        let html = format_html(&NewsletterContent::default());
        assert!(html.contains("<title></title>"));
        assert!(html.contains("<p></p>"));
        let md = format_markdown(&NewsletterContent::default());
        assert!(md.starts_with("# 🤖 \n"));
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!("html".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert_eq!("Markdown".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert!("pdf".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Markdown.extension(), "md");
    }
}
