//! Conversational retrieval session over the tool catalog.

use tracing::{info, instrument};

use toolkit_index::{VectorIndex, index_catalog, search};
use toolkit_llm::ChatModel;
use toolkit_shared::{ConversationTurn, Outcome, RagConfig, Result, ToolRecord};

use crate::catalog::ToolCatalog;
use crate::generator::ResponseGenerator;
use crate::history::{ConversationBuffer, DEFAULT_HISTORY_LIMIT};

/// Retrieval depth used when none is configured.
pub const DEFAULT_TOP_K: usize = 5;

/// Session tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Catalog documents retrieved per question.
    pub top_k: usize,
    /// Turns retained between questions.
    pub history_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl From<&RagConfig> for SessionOptions {
    fn from(config: &RagConfig) -> Self {
        Self {
            top_k: config.top_k,
            history_limit: config.history_limit,
        }
    }
}

/// A question-answering session that owns its conversation history.
pub struct RagSession<I, M> {
    catalog: ToolCatalog,
    index: I,
    generator: ResponseGenerator<M>,
    history: ConversationBuffer,
    top_k: usize,
}

impl<I, M> RagSession<I, M>
where
    I: VectorIndex,
    M: ChatModel,
{
    /// Index the whole catalog, then return a ready session.
    ///
    /// Indexing errors propagate; no session exists without a built index.
    #[instrument(skip_all, fields(tools = catalog.tools().len(), top_k = options.top_k))]
    pub async fn start(
        catalog: ToolCatalog,
        index: I,
        generator: ResponseGenerator<M>,
        options: SessionOptions,
    ) -> Result<Self> {
        info!("setting up vector store");
        index_catalog(&index, catalog.tools()).await?;
        info!("vector store ready");

        Ok(Self {
            catalog,
            index,
            generator,
            history: ConversationBuffer::new(options.history_limit),
            top_k: options.top_k,
        })
    }

    /// Answer `question` using the conversation so far.
    pub async fn query(&mut self, question: &str) -> Outcome<String> {
        self.query_with(question, true).await
    }

    /// Answer `question`, optionally ignoring prior turns.
    ///
    /// The exchange is recorded either way.
    #[instrument(skip(self))]
    pub async fn query_with(&mut self, question: &str, include_history: bool) -> Outcome<String> {
        info!("processing query");

        // Retrieval failure leaves the context empty but still asks the model
        let context = search(&self.index, question, self.top_k).await.into_value();

        let prior = if include_history {
            self.history.to_vec()
        } else {
            Vec::new()
        };
        let answer = self.generator.generate(question, &context, &prior).await;

        self.history.push(ConversationTurn::user(question));
        self.history
            .push(ConversationTurn::assistant(answer.value().clone()));

        answer
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("conversation history cleared");
    }

    /// Retained turns, oldest first.
    pub fn history(&self) -> &ConversationBuffer {
        &self.history
    }

    /// See [`ToolCatalog::recommend`].
    pub fn recommend(&self, category: Option<&str>, use_case: Option<&str>) -> Vec<&ToolRecord> {
        self.catalog.recommend(category, use_case)
    }
}
