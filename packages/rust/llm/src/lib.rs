//! Hosted language-model access for the AI toolkit.
//!
//! Two seams are defined here:
//! - [`ChatModel`]: one chat-style completion from an ordered message list
//! - [`Embedder`]: text to vectors, used by the retrieval index
//!
//! [`OpenAiClient`] implements both against any OpenAI-compatible HTTP API.
//! Callers own the fallback policy; these traits just report errors.

mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use toolkit_shared::{ConversationTurn, Result};

pub use openai::OpenAiClient;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// A hosted chat model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Submit the full message sequence and return the completion text.
    async fn complete(
        &self,
        messages: &[ConversationTurn],
        params: GenerationParams,
    ) -> Result<String>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// A hosted embedding model.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed each input; the output has one vector per input, in input order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[async_trait]
impl<T: ChatModel + ?Sized> ChatModel for Arc<T> {
    async fn complete(
        &self,
        messages: &[ConversationTurn],
        params: GenerationParams,
    ) -> Result<String> {
        (**self).complete(messages, params).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for Arc<T> {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).embed(inputs).await
    }
}
