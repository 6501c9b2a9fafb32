//! Newsletter section generation with the hosted model.
//!
//! Each section is one stateless prompt. A failed call yields that
//! section's fixed fallback text and never affects the other sections.

use tracing::{error, instrument};

use toolkit_llm::{ChatModel, GenerationParams};
use toolkit_shared::{ConversationTurn, NewsItem, Outcome};

/// Text used when there is nothing to summarize.
pub const NO_NEWS: &str = "No recent news found.";

/// Fallback for a failed summary call.
pub const SUMMARY_FALLBACK: &str = "Error generating content summary.";

/// Fallback for a failed tool-suggestion call.
pub const TOOLS_FALLBACK: &str = "• Check out the latest updates in the AI engineering ecosystem";

/// Characters of each item's description included in the summary prompt.
const DESCRIPTION_PREVIEW_CHARS: usize = 200;

const SUMMARY_PARAMS: GenerationParams = GenerationParams::new(0.7, 1500);
const INTRO_PARAMS: GenerationParams = GenerationParams::new(0.8, 200);
const TOOLS_PARAMS: GenerationParams = GenerationParams::new(0.7, 400);

/// Fallback for a failed intro call.
pub fn intro_fallback(topic: &str) -> String {
    format!("Welcome to this week's {topic} newsletter!")
}

/// Generates the three model-written newsletter sections.
pub struct ContentGenerator<M> {
    model: M,
    max_summary_items: usize,
}

impl<M: ChatModel> ContentGenerator<M> {
    pub fn new(model: M, max_summary_items: usize) -> Self {
        Self {
            model,
            max_summary_items,
        }
    }

    /// Summarize up to `max_summary_items` items under four fixed headings.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn summarize_news(&self, items: &[NewsItem]) -> Outcome<String> {
        if items.is_empty() {
            return Outcome::Success(NO_NEWS.to_string());
        }

        let prompt = summary_prompt(&format_news_items(items, self.max_summary_items));
        match self.ask(prompt, SUMMARY_PARAMS).await {
            Ok(text) => Outcome::Success(text),
            Err(reason) => {
                error!(error = %reason, "error generating summary");
                Outcome::degraded(SUMMARY_FALLBACK.to_string(), reason)
            }
        }
    }

    /// A short, conversational introduction for `topic`.
    #[instrument(skip(self))]
    pub async fn generate_intro(&self, topic: &str) -> Outcome<String> {
        match self.ask(intro_prompt(topic), INTRO_PARAMS).await {
            Ok(text) => Outcome::Success(text),
            Err(reason) => {
                error!(error = %reason, "error generating intro");
                Outcome::degraded(intro_fallback(topic), reason)
            }
        }
    }

    /// A bulleted list of trending tools.
    #[instrument(skip(self))]
    pub async fn suggest_tools(&self) -> Outcome<String> {
        match self.ask(TOOLS_PROMPT.to_string(), TOOLS_PARAMS).await {
            Ok(text) => Outcome::Success(text),
            Err(reason) => {
                error!(error = %reason, "error generating tool suggestions");
                Outcome::degraded(TOOLS_FALLBACK.to_string(), reason)
            }
        }
    }

    async fn ask(
        &self,
        prompt: String,
        params: GenerationParams,
    ) -> toolkit_shared::Result<String> {
        self.model
            .complete(&[ConversationTurn::user(prompt)], params)
            .await
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

const TOOLS_PROMPT: &str = "Suggest 3-5 trending AI engineering tools or resources that would be valuable \
for AI engineers this week. Include a brief description of each and why it's noteworthy.
Format as a bulleted list.";

fn summary_prompt(news_content: &str) -> String {
    format!(
        "As an AI Engineering newsletter editor, create a comprehensive weekly summary of the following AI/ML news.

Structure the summary with:
1. Key Highlights (3-4 most important stories)
2. Technical Developments
3. Industry News
4. Research Updates

Keep it engaging and informative for AI engineers and practitioners.

News Content:
{news_content}"
    )
}

fn intro_prompt(topic: &str) -> String {
    format!(
        "Write an engaging introduction for this week's {topic} newsletter.
Make it conversational, welcoming, and highlight what readers can expect.
Keep it under 100 words."
    )
}

/// Render the leading `max_items` items as prompt paragraphs.
pub fn format_news_items(items: &[NewsItem], max_items: usize) -> String {
    items
        .iter()
        .take(max_items)
        .map(|item| {
            let preview: String = item
                .description
                .chars()
                .take(DESCRIPTION_PREVIEW_CHARS)
                .collect();
            format!("**{}**\n{preview}...\nSource: {}", item.title, item.source)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
