//! Grounded answer generation.
//!
//! Builds the prompt from retrieved catalog documents and asks the hosted
//! chat model. A failed call becomes a fixed apology instead of an error.

use tracing::{error, instrument};

use toolkit_index::RetrievedDoc;
use toolkit_llm::{ChatModel, GenerationParams};
use toolkit_shared::{ConversationTurn, Outcome, RagConfig};

/// Answer returned when the model call fails.
pub const APOLOGY: &str =
    "I apologize, but I encountered an error generating a response. Please try again.";

const SYSTEM_PROMPT: &str = "You are an AI Engineering expert assistant. Your role is to help users find and understand \
AI tools, frameworks, and best practices. Use the provided context to give accurate, helpful recommendations.

Guidelines:
- Provide specific tool recommendations based on user needs
- Explain pros and cons of different options
- Include practical usage advice
- Suggest alternatives when appropriate
- Be honest about limitations";

/// Turns a question plus retrieved context into an answer.
pub struct ResponseGenerator<M> {
    model: M,
    params: GenerationParams,
}

impl<M: ChatModel> ResponseGenerator<M> {
    pub fn new(model: M, params: GenerationParams) -> Self {
        Self { model, params }
    }

    /// Generator using the configured RAG sampling parameters.
    pub fn from_config(model: M, config: &RagConfig) -> Self {
        Self::new(
            model,
            GenerationParams::new(config.temperature, config.max_tokens),
        )
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn params(&self) -> GenerationParams {
        self.params
    }

    /// Answer `query` from `context`, after any prior turns.
    #[instrument(skip_all, fields(model = self.model.model_name(), context = context.len()))]
    pub async fn generate(
        &self,
        query: &str,
        context: &[RetrievedDoc],
        history: &[ConversationTurn],
    ) -> Outcome<String> {
        let messages = build_messages(query, context, history);
        match self.model.complete(&messages, self.params).await {
            Ok(answer) => Outcome::Success(answer),
            Err(e) => {
                error!(error = %e, "error generating response");
                Outcome::degraded(APOLOGY.to_string(), e)
            }
        }
    }
}

/// Prior turns, then the system preamble, then the user prompt.
pub fn build_messages(
    query: &str,
    context: &[RetrievedDoc],
    history: &[ConversationTurn],
) -> Vec<ConversationTurn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.extend_from_slice(history);
    messages.push(ConversationTurn::system(SYSTEM_PROMPT));
    messages.push(ConversationTurn::user(user_prompt(query, context)));
    messages
}

fn user_prompt(query: &str, context: &[RetrievedDoc]) -> String {
    format!(
        "User Query: {query}

Relevant Tools and Information:
{}

Please provide a comprehensive answer that addresses the user's query using the above information.
Include specific tool recommendations, use cases, and any important considerations.",
        format_context(context)
    )
}

/// One paragraph per retrieved document.
pub fn format_context(context: &[RetrievedDoc]) -> String {
    context
        .iter()
        .map(|doc| {
            format!(
                "Tool: {}\nCategory: {}\nDetails: {}",
                doc.metadata.name, doc.metadata.category, doc.document
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
