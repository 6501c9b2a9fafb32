//! OpenAI-compatible HTTP client for chat completions and embeddings.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use toolkit_shared::{ConversationTurn, OpenAiSettings, Result, ToolkitError};

use crate::{ChatModel, Embedder, GenerationParams};

/// Timeout for a single API request.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("ai-toolkit/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body kept in error messages.
const MAX_ERROR_BODY: usize = 300;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationTurn],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// `{"error": {"message": "..."}}` as returned on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for an OpenAI-compatible API (`/v1/chat/completions`, `/v1/embeddings`).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    /// Build a client from resolved settings.
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ToolkitError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    /// POST a JSON body to `path` under the API base and decode the JSON reply.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = api_url(&self.settings.base_url, path)?;

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.settings.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ToolkitError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ToolkitError::Network(format!("{url}: failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(ToolkitError::Llm(format!(
                "{path}: HTTP {status}: {}",
                error_message(&text)
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| ToolkitError::parse(format!("{path}: invalid response body: {e}")))
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.settings.chat_model, messages = messages.len()))]
    async fn complete(
        &self,
        messages: &[ConversationTurn],
        params: GenerationParams,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.settings.chat_model,
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let response: ChatCompletionResponse =
            self.post_json("v1/chat/completions", &request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ToolkitError::Llm("completion contained no message content".into()))?;

        debug!(chars = content.len(), "completion received");
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.settings.chat_model
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.settings.embedding_model, inputs = inputs.len()))]
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.settings.embedding_model,
            input: inputs,
        };

        let mut response: EmbeddingResponse = self.post_json("v1/embeddings", &request).await?;

        if response.data.len() != inputs.len() {
            return Err(ToolkitError::Llm(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Join `path` onto `base`, keeping any path prefix the base already has.
fn api_url(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|e| ToolkitError::config(format!("invalid API path '{path}': {e}")))
}

/// Pull a readable message out of an error response body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.chars().take(MAX_ERROR_BODY).collect(),
    }
}
